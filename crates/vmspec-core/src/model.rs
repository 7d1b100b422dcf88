//! Instance specification data model
//!
//! These types mirror the external YAML/JSON representation key for key.
//! Optional booleans are tri-state (`Option<bool>`) so that an unset field can
//! be told apart from one explicitly set to `false`.
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Guest CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "aarch64")]
    Aarch64,
}

/// Root of the instance configuration tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,
    /// Boot image candidates, tried in order. Required.
    #[serde(default)]
    pub images: Vec<File>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    /// Human-readable byte quantity, e.g. `4GiB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// Human-readable byte quantity, e.g. `100GiB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<Mount>,
    #[serde(default, skip_serializing_if = "SshConfig::is_empty")]
    pub ssh: SshConfig,
    #[serde(default, skip_serializing_if = "FirmwareConfig::is_empty")]
    pub firmware: FirmwareConfig,
    #[serde(default, skip_serializing_if = "VideoConfig::is_empty")]
    pub video: VideoConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provision: Vec<Provision>,
    #[serde(default, skip_serializing_if = "ContainerdConfig::is_empty")]
    pub containerd: ContainerdConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub probes: Vec<Probe>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_forwards: Vec<PortForward>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<Network>,
    /// Deprecated, superseded by `networks`
    #[serde(default, skip_serializing_if = "NetworkDeprecated::is_settled")]
    pub network: NetworkDeprecated,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_host_resolver: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagate_proxy_env: Option<bool>,
}

/// A downloadable file: boot image or containerd archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,
    /// Content digest in `algorithm:hex` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl File {
    /// Create a file entry with only a location
    pub fn new<L: Into<String>>(location: L) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Whether this file can be used on `arch`. An untagged file matches any.
    pub fn matches_arch(&self, arch: Arch) -> bool {
        self.arch.map_or(true, |a| a == arch)
    }
}

/// Host directory shared with the guest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    pub location: String,
    /// Read-only unless explicitly opted in
    #[serde(default, skip_serializing_if = "is_false")]
    pub writable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_port: Option<u16>,
    /// Load `~/.ssh/*.pub` in addition to the instance key. Default: true
    #[serde(
        rename = "loadDotSSHPubKeys",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub load_dot_ssh_pub_keys: Option<bool>,
    /// Default: false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_agent: Option<bool>,
}

impl SshConfig {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The local port, treating an explicit zero as unset
    pub fn effective_local_port(&self) -> Option<u16> {
        self.local_port.filter(|port| *port != 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareConfig {
    /// Disables UEFI. Ignored on aarch64.
    #[serde(rename = "legacyBIOS", default, skip_serializing_if = "is_false")]
    pub legacy_bios: bool,
}

impl FirmwareConfig {
    pub fn is_empty(&self) -> bool {
        !self.legacy_bios
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// QEMU display string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl VideoConfig {
    pub fn is_empty(&self) -> bool {
        self.display.is_none()
    }
}

/// Privilege context a provisioning script runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionMode {
    System,
    User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProvisionMode>,
    #[serde(default)]
    pub script: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerdConfig {
    /// Default: false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
    /// Default: true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archives: Vec<File>,
}

impl ContainerdConfig {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    Readiness,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProbeMode>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub script: String,
    /// Shown to the user when the probe fails
    #[serde(default)]
    pub hint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proto {
    Tcp,
}

/// A guest-to-host port forwarding rule.
///
/// Each side carries either a single port or a two-element range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortForward {
    #[serde(rename = "guestIP", default, skip_serializing_if = "Option::is_none")]
    pub guest_ip: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_port_range: Option<Vec<u16>>,
    #[serde(rename = "hostIP", default, skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port_range: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto: Option<Proto>,
    /// Suppress forwarding for ports matching this rule
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore: bool,
}

/// A network attachment. `lima` and `vnl` are mutually exclusive and exactly
/// one of them is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lima: Option<String>,
    /// Virtual Network Locator of a VDE switch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnl: Option<String>,
    /// VDE switch port, not a TCP/UDP port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

impl Network {
    /// Managed network name, ignoring empty strings
    pub fn lima_name(&self) -> Option<&str> {
        self.lima.as_deref().filter(|s| !s.is_empty())
    }

    /// Virtual Network Locator, ignoring empty strings
    pub fn locator(&self) -> Option<&str> {
        self.vnl.as_deref().filter(|s| !s.is_empty())
    }
}

/// Whether the legacy network block has been copied into `networks`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MigrationStatus {
    #[default]
    NotMigrated,
    Migrated,
}

/// Legacy `network:` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDeprecated {
    #[serde(rename = "vde", default, skip_serializing_if = "Vec::is_empty")]
    pub vde_deprecated: Vec<VdeDeprecated>,
    #[serde(skip)]
    status: MigrationStatus,
}

impl NetworkDeprecated {
    pub fn new(vde_deprecated: Vec<VdeDeprecated>) -> Self {
        Self {
            vde_deprecated,
            status: MigrationStatus::NotMigrated,
        }
    }

    pub fn status(&self) -> MigrationStatus {
        self.status
    }

    pub fn is_migrated(&self) -> bool {
        self.status == MigrationStatus::Migrated
    }

    pub(crate) fn mark_migrated(&mut self) {
        self.status = MigrationStatus::Migrated;
    }

    /// Nothing left to migrate: either empty or already copied. Settled
    /// blocks are omitted on output so a re-decoded spec is never migrated
    /// twice.
    pub fn is_settled(&self) -> bool {
        self.vde_deprecated.is_empty() || self.is_migrated()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VdeDeprecated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    /// No longer used; dropped on migration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
