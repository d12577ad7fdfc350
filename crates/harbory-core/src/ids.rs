//! Strongly-typed identifiers for Docker resources.
//!
//! Every identifier ends up as a single path segment (`/images/{id}`). Image
//! references such as `ghcr.io/org/app:1.0` contain `/`, so identifiers are
//! percent-encoded by [`path_segment`](ImageId::path_segment) rather than
//! restricted to segment-safe characters.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed identifier wrapper types.
macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parses an identifier from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is empty, is `.` or `..`, or
            /// contains whitespace or control characters.
            pub fn parse_str(input: &str) -> Result<Self> {
                validate_segment(input)
                    .map(|()| Self(input.to_string()))
                    .map_err(|reason| {
                        Error::ValidationError(format!(
                            "Invalid {} `{input}`: {reason}",
                            stringify!($name)
                        ))
                    })
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the identifier percent-encoded for use as one URL path segment.
            #[must_use]
            pub fn path_segment(&self) -> Cow<'_, str> {
                urlencoding::encode(&self.0)
            }

            /// Converts into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = Error;

            fn try_from(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(s: String) -> Result<Self> {
                Self::parse_str(&s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

resource_id!(ContainerId, "Container ID or name");
resource_id!(ImageId, "Image ID or reference");
resource_id!(VolumeName, "Volume name");
resource_id!(NetworkId, "Network ID or name");
resource_id!(NodeId, "Swarm node ID or hostname");

fn validate_segment(input: &str) -> std::result::Result<(), &'static str> {
    if input.is_empty() {
        return Err("must not be empty");
    }
    if input == "." || input == ".." {
        return Err("must not be a relative path component");
    }
    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("must not contain whitespace or control characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER_ID: &str = "4f66ad9a0b2e5c1f3e0a9b8c7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a1b0c9d8e";

    #[test]
    fn test_container_id_parse_valid() {
        let id = ContainerId::parse_str(CONTAINER_ID).unwrap();
        assert_eq!(id.as_str(), CONTAINER_ID);
        assert_eq!(id.to_string(), CONTAINER_ID);
    }

    #[test]
    fn test_image_reference_with_tag() {
        let id: ImageId = "nginx:1.27-alpine".parse().unwrap();
        assert_eq!(id.as_ref(), "nginx:1.27-alpine");

        let id = ImageId::try_from("sha256:0123abcd").unwrap();
        assert_eq!(id.into_inner(), "sha256:0123abcd");
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(ContainerId::parse_str("").is_err());
        assert!(ContainerId::parse_str("..").is_err());
        assert!(NetworkId::parse_str(".").is_err());
        assert!(NodeId::parse_str("node 1").is_err());
        assert!(VolumeName::parse_str("data\n").is_err());
    }

    #[test]
    fn test_namespaced_image_references() {
        for reference in ["bitnami/redis:7.2", "ghcr.io/org/app:1.0", "library/nginx"] {
            let id = ImageId::parse_str(reference).unwrap();
            assert_eq!(id.as_str(), reference);
        }
    }

    #[test]
    fn test_path_segment_encoding() {
        let id = ImageId::parse_str("bitnami/redis:7.2").unwrap();
        assert_eq!(id.path_segment(), "bitnami%2Fredis%3A7.2");

        let id = NetworkId::parse_str("bridge/../x?y#z%").unwrap();
        assert!(!id.path_segment().contains(['/', '?', '#']));

        let id = VolumeName::parse_str("pgdata").unwrap();
        assert!(matches!(id.path_segment(), Cow::Borrowed("pgdata")));
    }

    #[test]
    fn test_error_names_the_type() {
        let err = VolumeName::parse_str("").unwrap_err();
        assert!(err.to_string().contains("VolumeName"));
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_serde_transparent() {
        let id = VolumeName::parse_str("pgdata").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pgdata\"");
        let back: VolumeName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
