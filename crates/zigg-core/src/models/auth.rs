use serde::{Deserialize, Serialize};

/// Body of `POST /login` and `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
