use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference data for one institution, populated out of band. The same row
/// shape backs both the `public_universities` and `private_colleges` tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InstitutionRow {
    pub id: i32,
    pub name: String,
    pub abbreviation: String,
    pub location: String,
    pub established: i32,
    pub description: String,
    pub about: String,
    pub website: Option<String>,
}
