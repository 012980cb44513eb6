//! `HOST:GUEST[:ro]` volume specifications

use crate::containers::{BindMount, BindTable};

use super::error::{Result, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSpec {
    pub host: String,
    pub guest: String,
    pub read_only: bool,
}

impl VolumeSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || ServiceError::InvalidVolumeSpec(spec.to_string());

        let parts: Vec<&str> = spec.split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        match parts.as_slice() {
            [host, guest] => Ok(Self {
                host: host.to_string(),
                guest: guest.to_string(),
                read_only: false,
            }),
            [host, guest, "ro"] => Ok(Self {
                host: host.to_string(),
                guest: guest.to_string(),
                read_only: true,
            }),
            _ => Err(invalid()),
        }
    }
}

impl std::str::FromStr for VolumeSpec {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse every spec, stopping at the first invalid one.
pub fn parse_volumes<S: AsRef<str>>(specs: &[S]) -> Result<Vec<VolumeSpec>> {
    specs.iter().map(|s| VolumeSpec::parse(s.as_ref())).collect()
}

/// Bind table keyed by host path, plus the guest mount points in input order.
/// A host path given twice keeps its last binding.
pub fn bind_table(specs: &[VolumeSpec]) -> (BindTable, Vec<String>) {
    let mut binds = BindTable::new();
    let mut mounts = Vec::with_capacity(specs.len());
    for spec in specs {
        binds.insert(
            spec.host.clone(),
            BindMount {
                bind: spec.guest.clone(),
                ro: spec.read_only,
            },
        );
        mounts.push(spec.guest.clone());
    }
    (binds, mounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(spec: &str) {
        match VolumeSpec::parse(spec) {
            Err(ServiceError::InvalidVolumeSpec(s)) => assert_eq!(s, spec),
            other => panic!("expected InvalidVolumeSpec for {:?}, got {:?}", spec, other),
        }
    }

    #[test]
    fn test_parse_read_write() {
        let spec = VolumeSpec::parse("/data:/var/data").unwrap();
        assert_eq!(
            spec,
            VolumeSpec {
                host: "/data".to_string(),
                guest: "/var/data".to_string(),
                read_only: false,
            }
        );
    }

    #[test]
    fn test_parse_read_only() {
        let spec: VolumeSpec = "/cfg:/etc/cfg:ro".parse().unwrap();
        assert_eq!(spec.host, "/cfg");
        assert_eq!(spec.guest, "/etc/cfg");
        assert!(spec.read_only);
    }

    #[test]
    fn test_parse_relative_names() {
        let spec = VolumeSpec::parse("a:b").unwrap();
        assert_eq!((spec.host.as_str(), spec.guest.as_str()), ("a", "b"));
        assert!(!spec.read_only);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for spec in [
            "",
            "/data",
            ":/var/data",
            "/data:",
            "/data::ro",
            "/data:/var/data:",
            "/data:/var/data:rw",
            "/data:/var/data:RO",
            "/data:/var/data:ro:extra",
            "::",
        ] {
            assert_invalid(spec);
        }
    }

    #[test]
    fn test_parse_volumes_stops_at_first_invalid() {
        let result = parse_volumes(&["/a:/b", "bad", "also:bad:x"]);
        match result {
            Err(ServiceError::InvalidVolumeSpec(s)) => assert_eq!(s, "bad"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_bind_table_scenario() {
        let specs = parse_volumes(&["/data:/var/data", "/cfg:/etc/cfg:ro"]).unwrap();
        let (binds, mounts) = bind_table(&specs);

        let mut expected = BindTable::new();
        expected.insert(
            "/data".to_string(),
            BindMount {
                bind: "/var/data".to_string(),
                ro: false,
            },
        );
        expected.insert(
            "/cfg".to_string(),
            BindMount {
                bind: "/etc/cfg".to_string(),
                ro: true,
            },
        );
        assert_eq!(binds, expected);
        assert_eq!(mounts, vec!["/var/data", "/etc/cfg"]);
    }

    #[test]
    fn test_bind_table_repeated_host_keeps_last() {
        let specs = parse_volumes(&["/data:/a", "/data:/b:ro"]).unwrap();
        let (binds, mounts) = bind_table(&specs);

        assert_eq!(binds.len(), 1);
        assert_eq!(
            binds.get("/data"),
            Some(&BindMount {
                bind: "/b".to_string(),
                ro: true,
            })
        );
        assert_eq!(mounts, vec!["/a", "/b"]);
    }

    #[test]
    fn test_bind_table_empty() {
        let (binds, mounts) = bind_table(&[]);
        assert!(binds.is_empty());
        assert!(mounts.is_empty());
    }
}
