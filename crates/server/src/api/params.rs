//! Query string access shared by the handlers.

use axum::extract::{rejection::QueryRejection, Query};
use tracing::warn;

/// Raw query string pairs in request order.
pub type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Value of the parameter `name`. When it is repeated the last value wins.
pub fn last_value(pairs: QueryPairs, name: &str) -> Option<String> {
    let pairs = match pairs {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable query string");
            return None;
        }
    };

    pairs
        .into_iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}
