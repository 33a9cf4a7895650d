#[derive(Debug)]
#[derive(sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[allow(dead_code)]
    pub email: String,
    pub pwhash: String,
    #[allow(dead_code)]
    pub session_id: Option<String>,
}
