//! 按租户分类登录的演示
//!
//! ```bash
//! TAGGED_PASSWORD_TENANT_CLASS=healthcare \
//! TAGGED_PASSWORD_PEPPER=StrongPepperUsedAcrossAllPBKDF2Hashes \
//! RUST_LOG=tagged_password=debug \
//! cargo run --example tenant_login
//! ```

use std::sync::Arc;

use tagged_password::credential::CredentialStore;
use tagged_password::password::{Pepper, codec};
use tagged_password::{CredentialService, EncoderConfig, InMemoryCredentialStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = EncoderConfig::from_env()?;
    if config.pepper.is_none() {
        warn!("TAGGED_PASSWORD_PEPPER not set, using a demo pepper");
        config = config.with_pepper(Pepper::new("demo-only-pepper"));
    }

    let encoder = Arc::new(config.build()?);
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = CredentialService::new(encoder, store.clone()).with_upgrade_on_login(true);

    service.seed("alice_global", "password123")?;
    service.seed("bob_global", "securePass456")?;

    for (identity, password) in [
        ("alice_global", "password123"),
        ("alice_global", "wrongpass"),
        ("bob_global", "securePass456"),
        ("charlie", "password123"),
    ] {
        let ok = service.authenticate(identity, password)?;
        info!(identity, ok, "login attempt");
    }

    // 只输出算法标签，不输出哈希本身
    if let Some(record) = store.find("alice_global")? {
        let tagged = codec::decode(&record.password_hash)?;
        println!("alice_global -> {}", tagged.algorithm_id);
    }

    Ok(())
}
