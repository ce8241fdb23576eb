// Cache File Name Contract Tests
//
// apt names every downloaded archive `<name>_<version>_<architecture>.deb`.
// The parser is the only thing standing between an odd file in the cache
// and a wrong deletion, so anything it does not recognise must be refused.
//
// **Problem**: Someone "relaxes" the parser to accept more names
// **Solution**: Contract tests for the accepted shape and for every refusal

use aptclean_core::{CleanError, PackageFileIdentity};

/// WHY: The three segments are name, version, architecture in that order
/// FORMAT: <name>_<version>_<architecture>.deb
/// BREAKS: Every oracle query if segments are swapped
#[test]
fn segments_are_name_version_architecture() {
    let id = PackageFileIdentity::parse("libssl3_3.0.11-1~deb12u2_amd64.deb").unwrap();

    assert_eq!(id.name, "libssl3");
    assert_eq!(id.version, "3.0.11-1~deb12u2");
    assert_eq!(id.architecture, "amd64");
    assert_eq!(id.package_spec(), "libssl3:amd64");
}

/// WHY: The suffix is optional
/// REASON: Callers may pass a bare stem
#[test]
fn suffix_is_optional() {
    assert_eq!(
        PackageFileIdentity::parse("foo_1.0_all").unwrap(),
        PackageFileIdentity::parse("foo_1.0_all.deb").unwrap()
    );
}

/// WHY: Anything but exactly three non-empty segments is refused
/// REASON: Package names never contain `_`, so extra segments mean a foreign file
/// SACRIFICES: If this fails, unknown files get verdicts and may be deleted
#[test]
fn malformed_names_are_refused() {
    let refused = [
        "malformed.deb",
        "foo_1.0.deb",
        "foo_1.0_amd64_extra.deb",
        "_1.0_amd64.deb",
        "foo__amd64.deb",
        "foo_1.0_.deb",
        ".deb",
        "",
    ];

    for name in refused {
        match PackageFileIdentity::parse(name) {
            Err(CleanError::ParseFailure(reported)) => assert_eq!(reported, name),
            other => panic!("{:?} should be refused, got {:?}", name, other),
        }
    }
}

/// WHY: The escaped epoch stays escaped in the identity
/// FORMAT: version segment is kept byte-for-byte; package_version decodes it
/// REASON: file_name() must rebuild the exact name on disk
#[test]
fn escaped_epoch_is_preserved_and_decoded() {
    let id = PackageFileIdentity::parse("vim_2%3a9.0.1378-2_amd64.deb").unwrap();

    assert_eq!(id.version, "2%3a9.0.1378-2");
    assert_eq!(id.package_version(), "2:9.0.1378-2");
    assert_eq!(id.file_name(), "vim_2%3a9.0.1378-2_amd64.deb");
}

/// WHY: Only a trailing `.deb` is stripped
/// REASON: Partial downloads (`.deb.part`) must never look like `foo:amd64`
#[test]
fn only_trailing_suffix_is_stripped() {
    let id = PackageFileIdentity::parse("foo_1.0_amd64.deb.part").unwrap();
    assert_eq!(id.architecture, "amd64.deb.part");
}
