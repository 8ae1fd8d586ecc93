//! Admin identity provisioning.
//!
//! # Usage
//!
//! ```bash
//! nextrade-cli admin create -e admin@nextrade.com -n "Ops Admin" -p '<password>'
//! ```

use nextrade_baas::{GoTrueClient, NewIdentity};
use nextrade_core::{Email, Role};
use secrecy::{ExposeSecret, SecretString};

use super::{CommandError, service_config};

/// Minimum password length accepted for new admins.
pub const MIN_PASSWORD_LEN: usize = 12;

/// Create a confirmed identity with the `admin` role claim.
///
/// # Returns
///
/// The identity provider's user ID.
pub async fn create_user(
    email: &str,
    name: &str,
    password: SecretString,
) -> Result<String, CommandError> {
    let identity = new_admin(email, name, password)?;
    let client = GoTrueClient::new(&service_config()?)?;

    tracing::info!("Creating admin identity: {}", identity.email);
    let user = client.create_user(&identity).await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(user.id)
}

/// Validate the inputs and build the provisioning request.
fn new_admin(email: &str, name: &str, password: SecretString) -> Result<NewIdentity, CommandError> {
    let email = Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(CommandError::WeakPassword(MIN_PASSWORD_LEN));
    }

    Ok(NewIdentity {
        email,
        name: name.trim().to_owned(),
        password,
        role: Role::Admin,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_admin_has_admin_role() {
        let identity = new_admin(
            "ops@nextrade.com",
            " Ops Admin ",
            SecretString::from("correct horse battery"),
        )
        .unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.name, "Ops Admin");
    }

    #[test]
    fn test_new_admin_rejects_bad_input() {
        assert!(matches!(
            new_admin("not-an-email", "x", SecretString::from("correct horse battery")),
            Err(CommandError::InvalidEmail(_))
        ));
        assert!(matches!(
            new_admin("ops@nextrade.com", "x", SecretString::from("short")),
            Err(CommandError::WeakPassword(MIN_PASSWORD_LEN))
        ));
    }
}
