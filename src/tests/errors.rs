/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

use alloc::string::ToString;

use crate::errors::AffinityError;

#[test]
fn error_messages() {
    assert_eq!(
        AffinityError::ErrorCode(22).to_string(),
        "processor affinity call failed with error code 22"
    );
    assert_eq!(
        AffinityError::OutOfRange { cpu: 2048, capacity: 1024 }.to_string(),
        "cpu 2048 is out of range: the mask holds 1024 cpus"
    );
    assert_eq!(
        AffinityError::PlatformNotSupported.to_string(),
        "processor affinity is not supported on this platform"
    );
}

#[test]
fn error_predicates() {
    let error = AffinityError::ErrorCode(22);
    assert_eq!(error.error_code(), Some(22));
    assert!(!error.is_out_of_range());
    assert!(!error.is_not_supported());

    let error = AffinityError::OutOfRange { cpu: 64, capacity: 64 };
    assert_eq!(error.error_code(), None);
    assert!(error.is_out_of_range());

    assert!(AffinityError::PlatformNotSupported.is_not_supported());
}
