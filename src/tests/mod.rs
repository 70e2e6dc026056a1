/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

mod affinity;
mod errors;

/// Installs a subscriber so that the crate's traces show up in the test output (`RUST_LOG=debug`)
fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn assert_send_sync<T: Send + Sync>(_thing: &T) {}

#[test]
fn test_cpu_id_is_send_sync() {
    assert_send_sync(&crate::affinity::CpuId::new(0));
}

#[cfg(any(target_os = "android", target_os = "linux"))]
#[test]
fn test_cpu_mask_is_send_sync() {
    assert_send_sync(&crate::mask::CpuMask::new());
}
