//! Default resolution
//!
//! Fills every unset optional field with its documented default. Explicit
//! values, including explicit `false`, are never overwritten.
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::model::{Arch, InstanceSpec, ProbeMode, Proto, ProvisionMode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

pub const DEFAULT_USE_HOST_RESOLVER: bool = true;
pub const DEFAULT_PROPAGATE_PROXY_ENV: bool = true;
pub const DEFAULT_LOAD_DOT_SSH_PUB_KEYS: bool = true;
pub const DEFAULT_FORWARD_AGENT: bool = false;
pub const DEFAULT_CONTAINERD_SYSTEM: bool = false;
pub const DEFAULT_CONTAINERD_USER: bool = true;

/// Overridable sizing defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Defaults {
    pub cpus: u32,
    pub memory: String,
    pub disk: String,
    pub video_display: String,
    /// Guest interface names are `{prefix}{index}`
    pub interface_prefix: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            cpus: 4,
            memory: "4GiB".to_string(),
            disk: "100GiB".to_string(),
            video_display: "none".to_string(),
            interface_prefix: "lima".to_string(),
        }
    }
}

/// Assign defaults to every unset field of `spec`.
///
/// `host_arch` is used for an unset `arch`; when it is `None` the field stays
/// unset and validation reports it.
pub fn fill_defaults(spec: &mut InstanceSpec, host_arch: Option<Arch>, defaults: &Defaults) {
    if spec.arch.is_none() {
        spec.arch = host_arch;
    }
    spec.cpus.get_or_insert(defaults.cpus);
    spec.memory.get_or_insert_with(|| defaults.memory.clone());
    spec.disk.get_or_insert_with(|| defaults.disk.clone());
    spec.video.display.get_or_insert_with(|| defaults.video_display.clone());

    spec.use_host_resolver.get_or_insert(DEFAULT_USE_HOST_RESOLVER);
    spec.propagate_proxy_env.get_or_insert(DEFAULT_PROPAGATE_PROXY_ENV);

    spec.ssh
        .load_dot_ssh_pub_keys
        .get_or_insert(DEFAULT_LOAD_DOT_SSH_PUB_KEYS);
    spec.ssh.forward_agent.get_or_insert(DEFAULT_FORWARD_AGENT);

    spec.containerd.system.get_or_insert(DEFAULT_CONTAINERD_SYSTEM);
    spec.containerd.user.get_or_insert(DEFAULT_CONTAINERD_USER);

    for provision in &mut spec.provision {
        provision.mode.get_or_insert(ProvisionMode::System);
    }
    for probe in &mut spec.probes {
        probe.mode.get_or_insert(ProbeMode::Readiness);
    }
    for rule in &mut spec.port_forwards {
        rule.proto.get_or_insert(Proto::Tcp);
    }
    fill_interface_names(spec, &defaults.interface_prefix);

    trace!(arch = ?spec.arch, cpus = ?spec.cpus, "Defaults applied");
}

/// Name unset interfaces `{prefix}{index}`, moving to the next free index
/// when that name is already set explicitly on another network.
fn fill_interface_names(spec: &mut InstanceSpec, prefix: &str) {
    let mut taken: HashSet<String> = spec
        .networks
        .iter()
        .filter_map(|network| network.interface.clone())
        .collect();

    for (i, network) in spec.networks.iter_mut().enumerate() {
        if network.interface.is_some() {
            continue;
        }
        let name = (i..)
            .map(|n| format!("{}{}", prefix, n))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_default();
        taken.insert(name.clone());
        network.interface = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{File, Network, PortForward, Probe, Provision};

    fn fill(spec: &mut InstanceSpec) {
        fill_defaults(spec, Some(Arch::X86_64), &Defaults::default());
    }

    #[test]
    fn test_unset_flags_get_documented_defaults() {
        let mut spec = InstanceSpec {
            images: vec![File::new("x.img")],
            ..InstanceSpec::default()
        };
        fill(&mut spec);

        assert_eq!(spec.arch, Some(Arch::X86_64));
        assert_eq!(spec.use_host_resolver, Some(true));
        assert_eq!(spec.propagate_proxy_env, Some(true));
        assert_eq!(spec.ssh.load_dot_ssh_pub_keys, Some(true));
        assert_eq!(spec.ssh.forward_agent, Some(false));
        assert_eq!(spec.containerd.system, Some(false));
        assert_eq!(spec.containerd.user, Some(true));
        assert_eq!(spec.cpus, Some(4));
        assert_eq!(spec.memory.as_deref(), Some("4GiB"));
        assert_eq!(spec.disk.as_deref(), Some("100GiB"));
        assert_eq!(spec.video.display.as_deref(), Some("none"));
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let mut spec = InstanceSpec {
            arch: Some(Arch::Aarch64),
            cpus: Some(2),
            use_host_resolver: Some(false),
            ..InstanceSpec::default()
        };
        spec.ssh.load_dot_ssh_pub_keys = Some(false);
        spec.ssh.forward_agent = Some(true);
        spec.containerd.user = Some(false);
        spec.containerd.system = Some(true);
        fill(&mut spec);

        assert_eq!(spec.arch, Some(Arch::Aarch64));
        assert_eq!(spec.cpus, Some(2));
        assert_eq!(spec.use_host_resolver, Some(false));
        assert_eq!(spec.ssh.load_dot_ssh_pub_keys, Some(false));
        assert_eq!(spec.ssh.forward_agent, Some(true));
        assert_eq!(spec.containerd.user, Some(false));
        assert_eq!(spec.containerd.system, Some(true));
    }

    #[test]
    fn test_list_entries_defaulted() {
        let mut spec = InstanceSpec {
            provision: vec![
                Provision::default(),
                Provision {
                    mode: Some(ProvisionMode::User),
                    script: "#!/bin/sh".to_string(),
                },
            ],
            probes: vec![Probe::default()],
            port_forwards: vec![PortForward::default()],
            networks: vec![Network::default(), Network::default()],
            ..InstanceSpec::default()
        };
        fill(&mut spec);

        assert_eq!(spec.provision[0].mode, Some(ProvisionMode::System));
        assert_eq!(spec.provision[1].mode, Some(ProvisionMode::User));
        assert_eq!(spec.probes[0].mode, Some(ProbeMode::Readiness));
        assert_eq!(spec.port_forwards[0].proto, Some(Proto::Tcp));
        assert_eq!(spec.networks[0].interface.as_deref(), Some("lima0"));
        assert_eq!(spec.networks[1].interface.as_deref(), Some("lima1"));
    }

    #[test]
    fn test_default_interface_skips_explicit_names() {
        let mut spec = InstanceSpec {
            networks: vec![
                Network {
                    lima: Some("a".to_string()),
                    ..Network::default()
                },
                Network {
                    lima: Some("b".to_string()),
                    interface: Some("lima0".to_string()),
                    ..Network::default()
                },
                Network {
                    lima: Some("c".to_string()),
                    ..Network::default()
                },
            ],
            ..InstanceSpec::default()
        };
        fill(&mut spec);

        let names: Vec<_> = spec
            .networks
            .iter()
            .map(|n| n.interface.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["lima1", "lima0", "lima2"]);
    }

    #[test]
    fn test_unknown_host_leaves_arch_unset() {
        let mut spec = InstanceSpec::default();
        fill_defaults(&mut spec, None, &Defaults::default());
        assert!(spec.arch.is_none());
    }

    #[test]
    fn test_fill_is_idempotent() {
        let mut spec = InstanceSpec {
            networks: vec![Network::default()],
            ..InstanceSpec::default()
        };
        fill(&mut spec);
        let once = spec.clone();
        fill(&mut spec);
        assert_eq!(spec, once);
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = Defaults {
            cpus: 8,
            memory: "8GiB".to_string(),
            ..Defaults::default()
        };
        let mut spec = InstanceSpec::default();
        fill_defaults(&mut spec, Some(Arch::X86_64), &defaults);
        assert_eq!(spec.cpus, Some(8));
        assert_eq!(spec.memory.as_deref(), Some("8GiB"));
        assert_eq!(spec.disk.as_deref(), Some("100GiB"));
    }
}
