use crate::errors::{Error, Result};

/// Merchant account credentials appended to every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    partner: String,
    password: String,
    user: Option<String>,
}

impl Credentials {
    /// Create credentials, failing fast when a required value is blank.
    ///
    /// `user` falls back to `login` when absent or blank.
    pub fn new(
        login: impl Into<String>,
        partner: impl Into<String>,
        password: impl Into<String>,
        user: Option<String>,
    ) -> Result<Self> {
        let login = required("login", login.into())?;
        let partner = required("partner", partner.into())?;
        let password = required("password", password.into())?;

        Ok(Credentials {
            login,
            partner,
            password,
            user: user.filter(|u| !u.trim().is_empty()),
        })
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn partner(&self) -> &str {
        &self.partner
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(&self.login)
    }
}

fn required(name: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(Error::MissingCredential(name))
    } else {
        Ok(value)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("partner", &self.partner)
            .field("password", &"<redacted>")
            .field("user", &self.user())
            .finish()
    }
}
