//! 集成测试：完整的认证流程
//!
//! 测试从注册、登录到租户重新分类后按需升级哈希的完整流程。

use std::sync::{Arc, Barrier};
use std::thread;

use tagged_password::credential::{CredentialRecord, CredentialService, CredentialStore};
use tagged_password::error::{Error, StorageError};
use tagged_password::password::{Pbkdf2Config, Pepper};
use tagged_password::{DelegatingPasswordEncoder, EncoderConfig, InMemoryCredentialStore};

fn build_encoder(tenant_class: &str) -> Arc<DelegatingPasswordEncoder> {
    let encoder = EncoderConfig::new()
        .with_tenant_class(tenant_class)
        .with_pepper(Pepper::new("StrongPepperUsedAcrossAllPBKDF2Hashes"))
        .with_bcrypt_cost(4)
        .with_pbkdf2(Pbkdf2Config::new().with_iterations(1_000))
        .build()
        .expect("Encoder should build");
    Arc::new(encoder)
}

/// 测试启动时写入初始账号并登录
#[test]
fn test_seed_and_login_flow() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = CredentialService::new(build_encoder("retail"), store.clone());

    // 1. 写入初始账号
    assert!(service.seed("alice_global", "password123").unwrap());
    assert!(service.seed("bob_global", "securePass456").unwrap());

    // 2. 重复写入不会覆盖
    assert!(!service.seed("alice_global", "changed").unwrap());
    assert_eq!(store.len().unwrap(), 2);

    // 3. 正确密码登录成功
    assert!(service.authenticate("alice_global", "password123").unwrap());
    assert!(service.authenticate("bob_global", "securePass456").unwrap());

    // 4. 错误密码或未知账号登录失败
    assert!(!service.authenticate("alice_global", "wrongpass").unwrap());
    assert!(!service.authenticate("alice_global", "securePass456").unwrap());
    assert!(!service.authenticate("charlie", "password123").unwrap());

    // 5. 存储的是带标签的哈希而不是原始密码
    let record = store.find("alice_global").unwrap().expect("Record should exist");
    assert!(record.password_hash.starts_with("{bcrypt}$2a$04$"));
    assert!(!record.password_hash.contains("password123"));
}

/// 测试受监管租户使用 PBKDF2
#[test]
fn test_regulated_tenant_flow() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = CredentialService::new(build_encoder("healthcare"), store.clone());

    service.register("alice_global", "password123").unwrap();

    let record = store.find("alice_global").unwrap().unwrap();
    assert!(record.password_hash.starts_with("{pbkdf2}$pbkdf2-sha256$i=1000,l=32$"));
    assert!(service.authenticate("alice_global", "password123").unwrap());
    assert!(!service.authenticate("alice_global", "wrongpass").unwrap());
}

/// 测试租户重新分类后登录时升级哈希
#[test]
fn test_reclassification_with_upgrade_on_login() {
    let store = Arc::new(InMemoryCredentialStore::new());

    // 1. 普通租户注册
    let retail = CredentialService::new(build_encoder("retail"), store.clone());
    retail.register("alice_global", "password123").unwrap();
    retail.register("bob_global", "securePass456").unwrap();

    // 2. 重启为受监管租户，开启登录升级
    let regulated =
        CredentialService::new(build_encoder("healthcare"), store.clone()).with_upgrade_on_login(true);

    // 3. 旧哈希仍可登录，登录后升级
    assert!(regulated.authenticate("alice_global", "password123").unwrap());
    let alice = store.find("alice_global").unwrap().unwrap();
    assert!(alice.password_hash.starts_with("{pbkdf2}"));
    assert!(alice.updated_at >= alice.created_at);

    // 4. 未登录的账号保持原样
    let bob = store.find("bob_global").unwrap().unwrap();
    assert!(bob.password_hash.starts_with("{bcrypt}"));
    assert!(regulated.encoder().needs_upgrade(&bob.password_hash).unwrap());

    // 5. 回退为普通租户后，两种哈希都能登录
    let retail_again = CredentialService::new(build_encoder("retail"), store.clone());
    assert!(retail_again.authenticate("alice_global", "password123").unwrap());
    assert!(retail_again.authenticate("bob_global", "securePass456").unwrap());
}

/// 测试 pepper 改变后 PBKDF2 哈希无法校验
#[test]
fn test_pepper_rotation_breaks_keyed_hashes() {
    let store = Arc::new(InMemoryCredentialStore::new());
    CredentialService::new(build_encoder("healthcare"), store.clone())
        .register("alice_global", "password123")
        .unwrap();

    let rotated = EncoderConfig::new()
        .with_tenant_class("healthcare")
        .with_pepper(Pepper::new("a-different-pepper"))
        .with_pbkdf2(Pbkdf2Config::new().with_iterations(1_000))
        .build()
        .unwrap();
    let service = CredentialService::new(Arc::new(rotated), store);

    assert!(!service.authenticate("alice_global", "password123").unwrap());
}

/// 测试存储中的损坏记录会返回错误而不是登录失败
#[test]
fn test_corrupt_records_surface_as_errors() {
    let store = Arc::new(InMemoryCredentialStore::new());
    store
        .save(&CredentialRecord::new("legacy", "$2a$10$untaggedlegacyhash"))
        .unwrap();
    store
        .save(&CredentialRecord::new("retired", "{sha1}a94a8fe5ccb19ba61c4c0873d391e987982fbbd3"))
        .unwrap();

    let service = CredentialService::new(build_encoder("retail"), store);

    let err = service.authenticate("legacy", "test").unwrap_err();
    assert!(err.is_malformed_hash());

    let err = service.authenticate("retired", "test").unwrap_err();
    assert!(err.is_unsupported_algorithm());
}

/// 测试修改密码使用当前默认算法
#[test]
fn test_change_password_uses_current_default() {
    let store = Arc::new(InMemoryCredentialStore::new());
    CredentialService::new(build_encoder("retail"), store.clone())
        .register("alice_global", "password123")
        .unwrap();

    let service = CredentialService::new(build_encoder("regulated"), store.clone());
    service.change_password("alice_global", "n3wPassw0rd").unwrap();

    let record = store.find("alice_global").unwrap().unwrap();
    assert!(record.password_hash.starts_with("{pbkdf2}"));
    assert!(service.authenticate("alice_global", "n3wPassw0rd").unwrap());
    assert!(!service.authenticate("alice_global", "password123").unwrap());
}

/// 测试同一身份并发注册时只有一个成功
#[test]
fn test_concurrent_registration_single_winner() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = Arc::new(CredentialService::new(build_encoder("retail"), store.clone()));

    for round in 0..20 {
        let identity = format!("user_{}", round);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = ["first-secret", "second-secret"]
            .into_iter()
            .map(|password| {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                let identity = identity.clone();
                thread::spawn(move || {
                    barrier.wait();
                    (password, service.register(&identity, password))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners: Vec<&str> = results
            .iter()
            .filter(|(_, r)| r.is_ok())
            .map(|(password, _)| *password)
            .collect();
        assert_eq!(winners.len(), 1, "round {}: exactly one registration wins", round);

        for (_, result) in &results {
            if let Err(err) = result {
                assert!(matches!(err, Error::Storage(StorageError::AlreadyExists(_))));
            }
        }

        // 存储的是胜出那次注册的密码
        assert!(service.authenticate(&identity, winners[0]).unwrap());
    }
}

/// 测试登录升级与改密并发时，改密结果不会被覆盖
#[test]
fn test_upgrade_on_login_races_change_password() {
    for round in 0..10 {
        let store = Arc::new(InMemoryCredentialStore::new());
        let identity = format!("dave_{}", round);
        CredentialService::new(build_encoder("retail"), store.clone())
            .register(&identity, "old-secret")
            .unwrap();

        let service = Arc::new(
            CredentialService::new(build_encoder("healthcare"), store.clone())
                .with_upgrade_on_login(true),
        );
        let barrier = Arc::new(Barrier::new(2));

        let login = {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            let identity = identity.clone();
            thread::spawn(move || {
                barrier.wait();
                service.authenticate(&identity, "old-secret").unwrap()
            })
        };
        let change = {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            let identity = identity.clone();
            thread::spawn(move || {
                barrier.wait();
                service.change_password(&identity, "new-secret").unwrap();
            })
        };

        login.join().unwrap();
        change.join().unwrap();

        // 无论交错顺序如何，最终只接受新密码
        assert!(service.authenticate(&identity, "new-secret").unwrap(), "round {}", round);
        assert!(!service.authenticate(&identity, "old-secret").unwrap(), "round {}", round);
    }
}
