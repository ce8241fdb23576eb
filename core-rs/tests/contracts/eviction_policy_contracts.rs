// Eviction Policy Contract Tests
//
// These tests pin the decision table that decides whether a cached package
// archive may be deleted. Deleting the wrong archive forces a re-download;
// keeping the wrong one fills the disk.
//
// **Problem**: A refactor "tidies" a branch and starts deleting pending upgrades
// **Solution**: One contract per row of the decision table

use aptclean_core::{
    CleanError, DebianOrdering, DeleteReason, EvictionPolicy, EvictionVerdict, KeepReason,
    PackageFileIdentity, StaticOracle, VersionOracle, MAX_ELAPSED,
};
use aptclean_core::errors::Result;
use chrono::{DateTime, Duration, Utc};

fn identity(file_name: &str) -> PackageFileIdentity {
    PackageFileIdentity::parse(file_name).unwrap()
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_760_000_000, 0).unwrap()
}

fn decide(oracle: StaticOracle, file_name: &str, changed_at: DateTime<Utc>) -> EvictionVerdict {
    EvictionPolicy::new(oracle, DebianOrdering)
        .decide_at(&identity(file_name), changed_at, now())
        .unwrap()
}

/// WHY: The archive apt will install on the next upgrade must survive
/// RULE: cached > installed AND cached == candidate → keep
/// REASON: Deleting it forces the upgrade to download it again
/// BREAKS: Offline upgrades prepared with `apt-get --download-only`
#[test]
fn pending_upgrade_is_kept() {
    let oracle = StaticOracle::new()
        .with_installed("foo", "amd64", "1.0")
        .with_candidate("foo", "amd64", "2.0");

    assert_eq!(
        decide(oracle, "foo_2.0_amd64.deb", now()),
        EvictionVerdict::Keep(KeepReason::PendingUpgrade)
    );
}

/// WHY: Newer archives apt will never pick are dead weight
/// RULE: cached > installed AND cached != candidate → delete
/// REASON: Pinning or a newer candidate makes this archive unreachable
/// BREAKS: Disk usage grows with every abandoned candidate
#[test]
fn newer_non_candidate_is_deleted() {
    let oracle = StaticOracle::new()
        .with_installed("foo", "amd64", "1.0")
        .with_candidate("foo", "amd64", "3.0");

    assert_eq!(
        decide(oracle, "foo_2.0_amd64.deb", now()),
        EvictionVerdict::Delete(DeleteReason::NotCandidate)
    );
}

/// WHY: The installed version and everything older are deletable
/// RULE: cached <= installed → delete, age does not matter
/// REASON: apt never downgrades on its own
/// BREAKS: Old archives accumulate forever
#[test]
fn installed_and_older_versions_are_deleted() {
    for file_name in ["foo_1.0_amd64.deb", "foo_0.9_amd64.deb"] {
        let oracle = StaticOracle::new()
            .with_installed("foo", "amd64", "1.0")
            .with_candidate("foo", "amd64", "1.0");

        assert_eq!(
            decide(oracle, file_name, now()),
            EvictionVerdict::Delete(DeleteReason::Superseded),
            "{} should be superseded",
            file_name
        );
    }
}

/// WHY: Archives of packages that are not installed get a grace period
/// RULE: not installed AND age <= 6 days → keep
/// REASON: The user may have downloaded them to install shortly
/// BREAKS: `apt-get install --download-only` followed by an install
#[test]
fn uninstalled_recent_archive_is_kept() {
    assert_eq!(
        decide(StaticOracle::new(), "bar_1.0_all.deb", now() - Duration::days(1)),
        EvictionVerdict::Keep(KeepReason::GracePeriod)
    );
}

/// WHY: The grace period ends
/// RULE: not installed AND age > 6 days → delete
/// BREAKS: Removed packages leave their archives behind forever
#[test]
fn uninstalled_old_archive_is_deleted() {
    assert_eq!(
        decide(StaticOracle::new(), "bar_1.0_all.deb", now() - Duration::days(7)),
        EvictionVerdict::Delete(DeleteReason::Expired)
    );
}

/// WHY: The boundary is strict
/// FORMAT: exactly 6 days keeps, one second more deletes
/// REASON: "more than six days" is the documented threshold
#[test]
fn grace_period_boundary_is_strict() {
    let six_days = Duration::from_std(MAX_ELAPSED).unwrap();

    assert_eq!(
        decide(StaticOracle::new(), "bar_1.0_all.deb", now() - six_days),
        EvictionVerdict::Keep(KeepReason::GracePeriod)
    );
    assert_eq!(
        decide(
            StaticOracle::new(),
            "bar_1.0_all.deb",
            now() - six_days - Duration::seconds(1)
        ),
        EvictionVerdict::Delete(DeleteReason::Expired)
    );
}

/// WHY: Clock skew must not delete anything
/// RULE: ctime in the future → keep
#[test]
fn future_change_time_is_kept() {
    assert_eq!(
        decide(StaticOracle::new(), "bar_1.0_all.deb", now() + Duration::days(30)),
        EvictionVerdict::Keep(KeepReason::GracePeriod)
    );
}

/// WHY: Architecture is part of the package identity
/// REASON: foo:i386 and foo:amd64 are installed independently (multiarch)
/// BREAKS: Archives for a foreign architecture judged against the native one
#[test]
fn architecture_separates_packages() {
    let oracle = StaticOracle::new().with_installed("foo", "amd64", "1.0");

    assert_eq!(
        decide(oracle, "foo_1.0_i386.deb", now()),
        EvictionVerdict::Keep(KeepReason::GracePeriod)
    );
}

/// WHY: No verdict without a candidate
/// RULE: candidate query fails → error, file is left alone
/// SACRIFICES: If this fails, an unreachable mirror turns into mass deletion
#[test]
fn missing_candidate_is_an_error() {
    let oracle = StaticOracle::new().with_installed("foo", "amd64", "1.0");

    let result = EvictionPolicy::new(oracle, DebianOrdering).decide_at(
        &identity("foo_2.0_amd64.deb"),
        now(),
        now(),
    );
    assert!(matches!(result, Err(CleanError::CandidateNotFound(_))));
}

/// WHY: A failed installed lookup means "not installed"
/// REASON: dpkg-query exits non-zero for unknown packages
/// BREAKS: Archives of removed packages never expire
#[test]
fn failed_installed_lookup_counts_as_not_installed() {
    struct Unreachable;

    impl VersionOracle for Unreachable {
        fn installed_version(&self, _: &str, _: &str) -> Result<Option<String>> {
            Err(CleanError::Query {
                command: "dpkg-query".to_string(),
                message: "database locked".to_string(),
            })
        }

        fn candidate_version(&self, name: &str, arch: &str) -> Result<String> {
            Err(CleanError::CandidateNotFound(format!("{}:{}", name, arch)))
        }
    }

    let policy = EvictionPolicy::new(Unreachable, DebianOrdering);
    let verdict = policy
        .decide_at(&identity("foo_1.0_amd64.deb"), now() - Duration::days(10), now())
        .unwrap();
    assert_eq!(verdict, EvictionVerdict::Delete(DeleteReason::Expired));
}

/// WHY: The version segment reaches the comparator exactly as written
/// FORMAT: apt writes `2:1.0` as `2%3a1.0` in archive names; it is not decoded
/// REASON: `dpkg --compare-versions` and the candidate check both see the raw segment
/// BREAKS: Verdicts for epoch packages change between releases of the cleaner
#[test]
fn escaped_epoch_is_compared_as_written() {
    let oracle = StaticOracle::new()
        .with_installed("vim", "amd64", "2:9.0-1")
        .with_candidate("vim", "amd64", "2:9.0-2");

    // Without the decoded epoch `2%3a9.0-2` is not newer than `2:9.0-1`
    assert_eq!(
        decide(oracle, "vim_2%3a9.0-2_amd64.deb", now()),
        EvictionVerdict::Delete(DeleteReason::Superseded)
    );
}
