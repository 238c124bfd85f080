use aws_config::{default_provider::credentials, provider_config::ProviderConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_types::region::Region;

/// Produces a default credentials provider from the current
/// environment (environment variables, shared config/credentials files,
/// then container/IMDS credentials, in that order).
pub async fn default_credentials_provider(region: Option<Region>) -> SharedCredentialsProvider {
    let mut builder =
        credentials::DefaultCredentialsChain::builder().configure(ProviderConfig::default());
    builder.set_region(region);
    SharedCredentialsProvider::new(builder.build().await)
}
