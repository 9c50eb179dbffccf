use crate::domain::otp::OtpFlow;
use anyhow::Result;
use async_trait::async_trait;

/// Delivers a plaintext one-time code to the address that requested it.
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str, flow: OtpFlow) -> Result<()>;
}
