/// Fields persisted when updating a user. `password_hash = None` keeps the
/// stored hash untouched.
#[derive(Debug, Clone)]
pub struct UpdateUserDto {
    pub name: String,
    pub login: String,
    pub password_hash: Option<String>,
    pub role: String,
}
