//! Verify an ID token against the configured provider.
//!
//! Run with: `cargo run -p identity-provider --example verify_token -- <id_token>`
//!
//! Reads `OIDC_*` variables from the environment. Without a
//! token argument, prints the hosted login URL instead.

use identity_provider::{IdentityProvider, OidcConfig, OidcProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = OidcConfig::from_env()?;
    let provider = OidcProvider::new(config)?;

    match std::env::args().nth(1) {
        Some(token) => {
            let identity = provider.verify(&token).await?;
            println!("email:   {}", identity.email);
            println!("subject: {}", identity.subject_id);
            println!("name:    {}", identity.name);
        }
        None => {
            if let Some(url) = provider.login_url() {
                println!("Sign in at: {}", url);
            }
        }
    }

    Ok(())
}
