//! Unresolved symbol errors.
//!
//! Raised when one table names an entry of another table that does not
//! exist: a trigger naming a missing result macro, a layer binding a
//! missing trigger, an animation setting naming a missing animation.

use crate::common::ErrorSeverity;

/// Reference error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    /// Trigger macro names a result macro that does not exist
    #[error("Trigger macro '{trigger}' references unknown result macro '{result}'")]
    MissingResult {
        /// Trigger macro name
        trigger: String,
        /// Missing result macro name
        result: String,
    },

    /// Layer binds a trigger macro that does not exist
    #[error("Layer '{layer}' binds unknown trigger macro '{trigger}'")]
    MissingTrigger {
        /// Layer name
        layer: String,
        /// Missing trigger macro name
        trigger: String,
    },

    /// A result element or routing entry names an undeclared capability
    #[error("'{user}' requires capability '{capability}' which is not declared")]
    MissingCapability {
        /// Symbol that needs the capability
        user: String,
        /// Missing capability name
        capability: String,
    },

    /// An animation trigger or setting names an unknown animation
    #[error("'{user}' references unknown animation '{animation}'")]
    MissingAnimation {
        /// Referencing symbol
        user: String,
        /// Missing animation name
        animation: String,
    },

    /// A result element names unknown animation settings
    #[error("'{user}' references unknown animation settings '{settings}'")]
    MissingAnimationSettings {
        /// Referencing symbol
        user: String,
        /// Missing settings name
        settings: String,
    },

    /// Animation settings name an activating trigger that does not exist
    #[error("Animation settings '{settings}' reference unknown trigger macro '{trigger}'")]
    MissingSettingsTrigger {
        /// Settings name
        settings: String,
        /// Missing trigger macro name
        trigger: String,
    },

    /// A layer result names a layer that was not declared
    #[error("'{user}' references layer {layer} but only {layers} layers exist")]
    MissingLayer {
        /// Referencing symbol
        user: String,
        /// Referenced layer id
        layer: usize,
        /// Number of declared layers
        layers: usize,
    },

    /// A scan code maps to a pixel id that was not declared
    #[error("'{user}' references pixel {pixel} which is not declared")]
    MissingPixel {
        /// Referencing symbol
        user: String,
        /// Missing pixel id
        pixel: u16,
    },

    /// A symbol lookup failed
    #[error("Unknown {kind} '{name}'")]
    UnknownSymbol {
        /// Symbol kind
        kind: String,
        /// Symbol name
        name: String,
    },
}

impl ReferenceError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Trigger macro → missing result macro.
    pub fn missing_result(trigger: impl Into<String>, result: impl Into<String>) -> Self {
        ReferenceError::MissingResult {
            trigger: trigger.into(),
            result: result.into(),
        }
    }

    /// Layer → missing trigger macro.
    pub fn missing_trigger(layer: impl Into<String>, trigger: impl Into<String>) -> Self {
        ReferenceError::MissingTrigger {
            layer: layer.into(),
            trigger: trigger.into(),
        }
    }

    /// Symbol → missing capability.
    pub fn missing_capability(user: impl Into<String>, capability: impl Into<String>) -> Self {
        ReferenceError::MissingCapability {
            user: user.into(),
            capability: capability.into(),
        }
    }

    /// Symbol → missing animation.
    pub fn missing_animation(user: impl Into<String>, animation: impl Into<String>) -> Self {
        ReferenceError::MissingAnimation {
            user: user.into(),
            animation: animation.into(),
        }
    }

    /// Symbol → missing animation settings.
    pub fn missing_settings(user: impl Into<String>, settings: impl Into<String>) -> Self {
        ReferenceError::MissingAnimationSettings {
            user: user.into(),
            settings: settings.into(),
        }
    }

    /// Animation settings → missing trigger macro.
    pub fn missing_settings_trigger(
        settings: impl Into<String>,
        trigger: impl Into<String>,
    ) -> Self {
        ReferenceError::MissingSettingsTrigger {
            settings: settings.into(),
            trigger: trigger.into(),
        }
    }

    /// Unknown symbol of a given kind.
    pub fn unknown(kind: impl Into<String>, name: impl Into<String>) -> Self {
        ReferenceError::UnknownSymbol {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_result_message() {
        let err = ReferenceError::missing_result("T0", "R9");
        assert_eq!(
            err.to_string(),
            "Trigger macro 'T0' references unknown result macro 'R9'"
        );
    }

    #[test]
    fn test_missing_layer_message() {
        let err = ReferenceError::MissingLayer {
            user: "R1".into(),
            layer: 4,
            layers: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("layer 4"));
        assert!(msg.contains("2 layers"));
    }

    #[test]
    fn test_reference_error_equality() {
        assert_eq!(
            ReferenceError::unknown("capability", "usbKeyOut"),
            ReferenceError::unknown("capability", "usbKeyOut")
        );
    }
}
