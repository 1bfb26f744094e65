use crate::db::DatabaseError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde goes through the same string mapping.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(AdherenceStatus {
    Taken => "taken",
    Missed => "missed",
    Skipped => "skipped",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn adherence_status_round_trips_through_str() {
        for status in [
            AdherenceStatus::Taken,
            AdherenceStatus::Missed,
            AdherenceStatus::Skipped,
        ] {
            assert_eq!(AdherenceStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = AdherenceStatus::from_str("forgotten").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AdherenceStatus::Missed).unwrap();
        assert_eq!(json, "\"missed\"");
        let back: AdherenceStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AdherenceStatus::Missed);
    }

    #[test]
    fn serde_rejects_unknown_status_with_enum_error() {
        let err = serde_json::from_str::<AdherenceStatus>("\"forgotten\"").unwrap_err();
        assert!(err.to_string().contains("Invalid enum value for AdherenceStatus: forgotten"));
    }
}
