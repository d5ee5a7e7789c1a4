use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::flow::FlowError;

#[derive(Debug)]
pub struct FlowRejection(pub FlowError);

impl warp::reject::Reject for FlowRejection {}

impl From<FlowError> for FlowRejection {
    fn from(error: FlowError) -> Self {
        Self(error)
    }
}

/// Request bodies the proxy refuses to buffer.
#[derive(Debug, thiserror::Error)]
pub enum BodyRejection {
    #[error("Request body is larger than {0} bytes")]
    TooLarge(u64),
    #[error("Request body must declare its Content-Length")]
    LengthRequired,
}

impl warp::reject::Reject for BodyRejection {}

impl BodyRejection {
    fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::LengthRequired => StatusCode::LENGTH_REQUIRED,
        }
    }
}

fn status_of(error: &FlowError) -> StatusCode {
    match error {
        FlowError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub async fn handle_reject(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(FlowRejection(e)) = err.find::<FlowRejection>() {
        Ok(warp::reply::with_status(e.to_string(), status_of(e)))
    } else if let Some(e) = err.find::<BodyRejection>() {
        Ok(warp::reply::with_status(e.to_string(), e.status()))
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        Ok(warp::reply::with_status(e.to_string(), StatusCode::BAD_REQUEST))
    } else {
        Err(err)
    }
}
