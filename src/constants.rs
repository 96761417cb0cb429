pub mod session {

    /// Session key holding the serialized `SessionContext`.
    pub const ACCOUNT_KEY: &str = "account";
}

pub mod redirects {

    /// Where a logged-in client is sent.
    pub const TRACKER: &str = "/tracker";

    /// Where a logged-out client is sent.
    pub const HOME: &str = "/";
}
