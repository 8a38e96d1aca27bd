/// One row of the user-and-roles projection: the user repeated per authority.
#[derive(Debug, Clone)]
pub struct UserDetailsRow {
    pub username: String,
    pub password: String,
    pub authority: String,
}

/// Credential view consumed by the login flow.
#[derive(Debug, Clone)]
pub struct UserDetails {
    pub username: String,
    pub password: String,
    pub authorities: Vec<String>,
}
