use uuid::Uuid;

/// Fields persisted when inserting a user. The password is already hashed
/// by the caller; plaintext never reaches the repository.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    /// Identifier to use; a fresh UUID is assigned when absent
    pub id: Option<Uuid>,
    pub name: String,
    pub login: String,
    pub password_hash: String,
    pub role: String,
}
