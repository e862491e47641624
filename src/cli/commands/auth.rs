use anyhow::{Context as _, Result};
use frontend::Credentials;
use serde_json::json;
use tracing::info;

use super::Context;
use crate::output::{render, success};

pub async fn signup(ctx: &Context, email: &str, password: &str) -> Result<String> {
    let credentials = Credentials::new(email, password);
    credentials.check()?;

    let outcome = ctx.auth.sign_up(&credentials.email, &credentials.password).await?;
    info!(user_id = %outcome.user.id, signed_in = outcome.signed_in, "Account created");

    render(
        &json!({ "user": outcome.user, "signed_in": outcome.signed_in }),
        ctx.output,
        || {
            if outcome.signed_in {
                success(&format!("Account created. Signed in as {}", credentials.email))
            } else {
                success("Account created. Check your email to confirm it, then sign in.")
            }
        },
    )
}

pub async fn signin(ctx: &Context, email: &str, password: &str) -> Result<String> {
    let credentials = Credentials::new(email, password);
    credentials.check()?;

    let session = ctx.auth.sign_in(&credentials.email, &credentials.password).await?;
    render(&session.user, ctx.output, || {
        success(&format!("Signed in as {}", credentials.email))
    })
}

pub async fn signout(ctx: &Context) -> Result<String> {
    ctx.auth
        .sign_out()
        .await
        .context("Signed out locally, but the server did not end the session")?;
    Ok(success("Signed out"))
}

pub async fn whoami(ctx: &Context) -> Result<String> {
    let user = ctx.auth.current_session().await.map(|session| session.user);
    render(&user, ctx.output, || match &user {
        Some(user) => user.email.clone().unwrap_or_else(|| user.id.to_string()),
        None => "Not signed in".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::context;
    use frontend::mock_backend::InMemoryBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_signin_then_whoami_then_signout() {
        let backend = Arc::new(InMemoryBackend::new().with_user("buyer@example.com", "hunter22"));
        let ctx = context(backend.clone());

        assert_eq!(whoami(&ctx).await.unwrap(), "Not signed in");

        let message = signin(&ctx, " buyer@example.com ", "hunter22").await.unwrap();
        assert!(message.contains("Signed in as buyer@example.com"));
        assert_eq!(whoami(&ctx).await.unwrap(), "buyer@example.com");

        signout(&ctx).await.unwrap();
        assert!(backend.sessions().current().is_none());
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_backend() {
        let backend = Arc::new(InMemoryBackend::new());
        let ctx = context(backend);

        let err = signin(&ctx, "not-an-email", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid email address");
    }

    #[tokio::test]
    async fn test_signup_without_confirmation_asks_to_check_email() {
        let backend = Arc::new(InMemoryBackend::new());
        let ctx = context(backend.clone());

        let message = signup(&ctx, "new@example.com", "secret1").await.unwrap();
        assert!(message.contains("Check your email"));
        assert!(backend.sessions().current().is_none());
    }
}
