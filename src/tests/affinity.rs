/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

use alloc::vec::Vec;

use crate::affinity::{CpuId, cpu_count, get_processor_affinity, set_for_current, set_processor_affinity};
use crate::errors::AffinityError;
use crate::tests::setup_tracing;

#[test]
fn cpu_id_conversions() {
    let cpu = CpuId::from(3);
    assert_eq!(cpu.index(), 3);
    assert_eq!(usize::from(cpu), 3);
    assert_eq!(alloc::format!("{cpu}"), "cpu3");
    assert!(CpuId::new(1) < CpuId::new(2));
}

#[cfg(any(target_os = "android", target_os = "linux", windows))]
#[test]
fn current_thread_has_affinity() {
    setup_tracing();
    let cpus = get_processor_affinity().unwrap();
    assert!(!cpus.is_empty());
    assert!(cpus.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(cpu_count().unwrap() >= 1);
}

#[cfg(any(target_os = "android", target_os = "linux", windows))]
#[test]
fn pin_to_first_allowed_cpu() {
    setup_tracing();
    std::thread::spawn(|| {
        let cpus = get_processor_affinity().unwrap();
        let first = cpus[0];
        let effective = set_processor_affinity(&[first]).unwrap();
        assert_eq!(effective, [first]);
        assert_eq!(get_processor_affinity().unwrap(), [first]);

        // widen again to what was allowed before
        let effective = set_processor_affinity(&cpus).unwrap();
        assert_eq!(effective, cpus);
    })
    .join()
    .unwrap();
}

#[cfg(any(target_os = "android", target_os = "linux", windows))]
#[test]
fn pin_each_thread_to_its_own_cpu() {
    setup_tracing();
    let cpus = get_processor_affinity().unwrap();
    let pinned = crossbeam_utils::thread::scope(|scope| {
        let handles = cpus
            .iter()
            .map(|&cpu| {
                scope.spawn(move |_| {
                    set_for_current(cpu).unwrap();
                    get_processor_affinity().unwrap()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    })
    .unwrap();
    for (cpu, affinity) in cpus.iter().zip(pinned) {
        assert_eq!(affinity, [*cpu]);
    }
}

#[cfg(any(target_os = "android", target_os = "linux", windows))]
#[test]
fn out_of_range_cpu_is_rejected() {
    setup_tracing();
    std::thread::spawn(|| {
        let before = get_processor_affinity().unwrap();
        let error = set_processor_affinity(&[CpuId::new(usize::MAX)]).unwrap_err();
        assert!(error.is_out_of_range());
        assert!(set_for_current(CpuId::new(usize::MAX)).unwrap_err().is_out_of_range());
        assert_eq!(get_processor_affinity().unwrap(), before);
    })
    .join()
    .unwrap();
}

#[cfg(any(target_os = "android", target_os = "linux"))]
#[test]
fn empty_affinity_is_rejected_by_the_os() {
    setup_tracing();
    std::thread::spawn(|| {
        let before = get_processor_affinity().unwrap();
        let error = set_processor_affinity(&[]).unwrap_err();
        assert_eq!(error, AffinityError::ErrorCode(libc::EINVAL));
        assert_eq!(get_processor_affinity().unwrap(), before);
    })
    .join()
    .unwrap();
}

#[cfg(not(any(target_os = "android", target_os = "linux", windows)))]
#[test]
fn unsupported_platform() {
    assert_eq!(get_processor_affinity(), Err(AffinityError::PlatformNotSupported));
    assert_eq!(set_processor_affinity(&[CpuId::new(0)]), Err(AffinityError::PlatformNotSupported));
    assert_eq!(set_for_current(CpuId::new(0)), Err(AffinityError::PlatformNotSupported));
    assert_eq!(cpu_count(), Err(AffinityError::PlatformNotSupported));
}
