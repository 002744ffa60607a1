use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field in a partial update: left out, explicitly `null`, or set.
///
/// Serde maps an absent key to `Missing` (the field needs
/// `#[serde(default)]`) and `null` to `Null`. Serialize with
/// `skip_serializing_if = "Patch::is_missing"` so `Missing` stays off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Writes the patch into an optional slot. `Missing` leaves it untouched.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Missing => {}
            Patch::Null => *slot = None,
            Patch::Value(v) => *slot = Some(v),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Null, Patch::Value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => v.serialize(serializer),
            Patch::Missing | Patch::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Patch;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize, Serialize)]
    struct Body {
        #[serde(default, skip_serializing_if = "Patch::is_missing")]
        priority: Patch<i64>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        let null: Body = serde_json::from_str(r#"{"priority":null}"#).unwrap();
        let value: Body = serde_json::from_str(r#"{"priority":3}"#).unwrap();
        assert_eq!(absent.priority, Patch::Missing);
        assert_eq!(null.priority, Patch::Null);
        assert_eq!(value.priority, Patch::Value(3));
    }

    #[test]
    fn missing_is_not_serialized() {
        assert_eq!(serde_json::to_string(&Body { priority: Patch::Missing }).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&Body { priority: Patch::Null }).unwrap(), r#"{"priority":null}"#);
    }

    #[test]
    fn apply_to_slot() {
        let mut slot = Some(4);
        Patch::Missing.apply_to(&mut slot);
        assert_eq!(slot, Some(4));
        Patch::Value(7).apply_to(&mut slot);
        assert_eq!(slot, Some(7));
        Patch::Null.apply_to(&mut slot);
        assert_eq!(slot, None);
    }
}
