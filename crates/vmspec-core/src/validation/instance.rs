//! Whole-spec validation
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::model::{File, InstanceSpec};
use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationErrors};
use crate::validation::network::NetworksValidator;
use crate::validation::port_forward::PortForwardValidator;
use std::collections::HashSet;

/// Validates a migrated and defaulted [`InstanceSpec`]
#[derive(Debug, Default)]
pub struct InstanceSpecValidator {
    networks: NetworksValidator,
    port_forwards: PortForwardValidator,
}

impl InstanceSpecValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_files(files: &[File], ctx: &ValidationContext, errors: &mut ValidationErrors) {
        for (i, file) in files.iter().enumerate() {
            let entry = ctx.child_index(i);
            errors.record(ValidationHelpers::validate_non_empty(
                &file.location,
                "location",
                &entry.child("location"),
            ));
            if let Some(digest) = file.digest.as_deref() {
                errors.record(ValidationHelpers::validate_digest(digest, &entry.child("digest")));
            }
        }
    }

    fn collect_images(spec: &InstanceSpec, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        let images = ctx.child("images");
        if spec.images.is_empty() {
            errors.add(ValidationError::with_violations(
                images.path.clone(),
                "at least one image is required",
                vec![ValidationError::create_violation(
                    "required_array",
                    "non-empty images",
                    "empty array",
                )],
            ));
        } else {
            Self::collect_files(&spec.images, &images, errors);
        }

        match spec.arch {
            None => errors.add(ValidationError::with_violations(
                ctx.child("arch").path,
                "architecture is not set and could not be detected from the host",
                vec![ValidationError::create_violation(
                    "resolved_arch",
                    "x86_64 or aarch64",
                    "unset",
                )],
            )),
            Some(arch)
                if !spec.images.is_empty()
                    && !spec.images.iter().any(|f| f.matches_arch(arch)) =>
            {
                errors.add(ValidationError::with_violations(
                    images.path,
                    format!("no image matches architecture {}", arch),
                    vec![ValidationError::create_violation(
                        "image_arch",
                        format!("an image for {} or without arch", arch),
                        "none",
                    )],
                ))
            }
            Some(_) => {}
        }
    }

    fn collect_sizing(spec: &InstanceSpec, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        if spec.cpus == Some(0) {
            errors.add(ValidationError::with_violations(
                ctx.child("cpus").path,
                "cpus must be greater than zero",
                vec![ValidationError::create_violation("positive_cpus", "> 0", "0")],
            ));
        }
        if let Some(memory) = spec.memory.as_deref() {
            errors.record(ValidationHelpers::validate_byte_size(
                memory,
                "memory",
                &ctx.child("memory"),
            ));
        }
        if let Some(disk) = spec.disk.as_deref() {
            errors.record(ValidationHelpers::validate_byte_size(disk, "disk", &ctx.child("disk")));
        }
    }

    fn collect_mounts(spec: &InstanceSpec, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        let mounts = ctx.child("mounts");
        let mut seen = HashSet::new();
        for (i, mount) in spec.mounts.iter().enumerate() {
            let location = mounts.child_index(i).child("location");
            if mount.location.is_empty() {
                errors.record(ValidationHelpers::validate_non_empty(
                    &mount.location,
                    "location",
                    &location,
                ));
            } else if !seen.insert(mount.location.as_str()) {
                errors.add(ValidationError::with_violations(
                    location.path,
                    format!("location '{}' is mounted more than once", mount.location),
                    vec![ValidationError::create_violation(
                        "unique_mount",
                        "unique mount location",
                        mount.location.as_str(),
                    )],
                ));
            }
        }
    }

    fn collect_scripts(
        spec: &InstanceSpec,
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        let provision = ctx.child("provision");
        for (i, entry) in spec.provision.iter().enumerate() {
            errors.record(ValidationHelpers::validate_non_empty(
                &entry.script,
                "script",
                &provision.child_index(i).child("script"),
            ));
        }
        let probes = ctx.child("probes");
        for (i, probe) in spec.probes.iter().enumerate() {
            errors.record(ValidationHelpers::validate_non_empty(
                &probe.script,
                "script",
                &probes.child_index(i).child("script"),
            ));
        }
    }

    fn collect_resolver(
        spec: &InstanceSpec,
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        let env = ctx.child("env");
        if spec.env.keys().any(|key| key.is_empty()) {
            errors.record(ValidationHelpers::validate_non_empty(
                "",
                "environment variable name",
                &env,
            ));
        }

        let dns = ctx.child("dns");
        for (i, addr) in spec.dns.iter().enumerate() {
            if addr.is_unspecified() {
                errors.add(ValidationError::with_violations(
                    dns.child_index(i).path,
                    format!("{} is not a usable resolver address", addr),
                    vec![ValidationError::create_violation(
                        "dns_address",
                        "a specific IP address",
                        addr.to_string(),
                    )],
                ));
            }
        }
    }

    fn collect_ssh(spec: &InstanceSpec, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        if ctx.is_strict() && spec.ssh.effective_local_port().is_none() {
            errors.add(ValidationError::with_violations(
                ctx.child("ssh").child("localPort").path,
                "ssh.localPort is required",
                vec![ValidationError::create_violation(
                    "required_ssh_port",
                    "a local port between 1 and 65535",
                    "unset",
                )],
            ));
        }
    }
}

impl SchemaValidator for InstanceSpecValidator {
    type Input = InstanceSpec;

    fn collect(&self, spec: &InstanceSpec, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        Self::collect_images(spec, ctx, errors);
        Self::collect_sizing(spec, ctx, errors);
        Self::collect_mounts(spec, ctx, errors);
        Self::collect_ssh(spec, ctx, errors);
        Self::collect_scripts(spec, ctx, errors);
        Self::collect_files(
            &spec.containerd.archives,
            &ctx.child("containerd").child("archives"),
            errors,
        );

        let port_forwards = ctx.child("portForwards");
        for (i, rule) in spec.port_forwards.iter().enumerate() {
            self.port_forwards
                .collect(rule, &port_forwards.child_index(i), errors);
        }

        self.networks
            .collect(&spec.networks, &ctx.child("networks"), errors);

        Self::collect_resolver(spec, ctx, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Arch, Mount, Provision};
    use std::net::{IpAddr, Ipv4Addr};

    fn valid_spec() -> InstanceSpec {
        InstanceSpec {
            arch: Some(Arch::X86_64),
            images: vec![File::new("x.img")],
            cpus: Some(4),
            memory: Some("4GiB".to_string()),
            disk: Some("100GiB".to_string()),
            ..InstanceSpec::default()
        }
    }

    fn errors_of(spec: &InstanceSpec) -> ValidationErrors {
        InstanceSpecValidator::new().validate(spec).err().unwrap_or_default()
    }

    #[test]
    fn test_valid_spec_passes() {
        assert!(errors_of(&valid_spec()).is_empty());
    }

    #[test]
    fn test_missing_images() {
        let spec = InstanceSpec {
            images: vec![],
            ..valid_spec()
        };
        let errors = errors_of(&spec);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].path, "$.images");
    }

    #[test]
    fn test_no_image_for_arch() {
        let spec = InstanceSpec {
            images: vec![File {
                arch: Some(Arch::Aarch64),
                ..File::new("arm.img")
            }],
            ..valid_spec()
        };
        let errors = errors_of(&spec);
        assert_eq!(errors.errors[0].rule(), Some("image_arch"));

        let mixed = InstanceSpec {
            images: vec![
                File {
                    arch: Some(Arch::Aarch64),
                    ..File::new("arm.img")
                },
                File {
                    arch: Some(Arch::X86_64),
                    ..File::new("amd.img")
                },
            ],
            ..valid_spec()
        };
        assert!(errors_of(&mixed).is_empty());
    }

    #[test]
    fn test_unresolved_arch() {
        let spec = InstanceSpec {
            arch: None,
            ..valid_spec()
        };
        assert_eq!(errors_of(&spec).at_path("$.arch").count(), 1);
    }

    #[test]
    fn test_all_violations_are_reported() {
        let spec = InstanceSpec {
            cpus: Some(0),
            memory: Some("0".to_string()),
            disk: Some("huge".to_string()),
            dns: vec![IpAddr::V4(Ipv4Addr::UNSPECIFIED)],
            ..valid_spec()
        };
        let errors = errors_of(&spec);
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["$.cpus", "$.memory", "$.disk", "$.dns[0]"]);
    }

    #[test]
    fn test_empty_env_key() {
        let mut spec = valid_spec();
        spec.env.insert(String::new(), "value".to_string());
        spec.env.insert("OK".to_string(), "value".to_string());
        assert_eq!(errors_of(&spec).at_path("$.env").count(), 1);
    }

    #[test]
    fn test_duplicate_mounts() {
        let spec = InstanceSpec {
            mounts: vec![
                Mount {
                    location: "~".to_string(),
                    writable: false,
                },
                Mount {
                    location: "~".to_string(),
                    writable: true,
                },
            ],
            ..valid_spec()
        };
        let errors = errors_of(&spec);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].path, "$.mounts[1].location");
    }

    #[test]
    fn test_empty_script() {
        let spec = InstanceSpec {
            provision: vec![Provision::default()],
            ..valid_spec()
        };
        assert_eq!(errors_of(&spec).at_path("$.provision[0].script").count(), 1);
    }

    #[test]
    fn test_bad_archive_digest() {
        let mut spec = valid_spec();
        spec.containerd.archives.push(File {
            digest: Some("sha256:1234".to_string()),
            ..File::new("nerdctl.tar.gz")
        });
        assert_eq!(
            errors_of(&spec)
                .at_path("$.containerd.archives[0].digest")
                .count(),
            1
        );
    }

    #[test]
    fn test_ssh_port_only_required_in_strict_mode() {
        let spec = valid_spec();
        let validator = InstanceSpecValidator::new();
        assert!(validator.validate(&spec).is_ok());

        let errors = validator.validate_strict(&spec).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].path, "$.ssh.localPort");

        let mut with_port = valid_spec();
        with_port.ssh.local_port = Some(60022);
        assert!(validator.validate_strict(&with_port).is_ok());
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let spec = InstanceSpec {
            cpus: Some(0),
            ..valid_spec()
        };
        let before = spec.clone();
        let _ = errors_of(&spec);
        assert_eq!(spec, before);
    }
}
