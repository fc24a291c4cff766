use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Wire form of a result: `{"ok":true,"val":T}` or `{"ok":false,"err":E}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T, E> {
    Ok(T),
    Err(E),
}

impl<T, E> Envelope<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }

    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }

    pub fn as_ref(&self) -> Envelope<&T, &E> {
        match self {
            Envelope::Ok(val) => Envelope::Ok(val),
            Envelope::Err(err) => Envelope::Err(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for Envelope<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(val) => Envelope::Ok(val),
            Err(err) => Envelope::Err(err),
        }
    }
}

impl<T, E> From<Envelope<T, E>> for Result<T, E> {
    fn from(envelope: Envelope<T, E>) -> Self {
        match envelope {
            Envelope::Ok(val) => Ok(val),
            Envelope::Err(err) => Err(err),
        }
    }
}

impl<T: Serialize, E: Serialize> Serialize for Envelope<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Envelope::Ok(val) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("val", val)?;
            }
            Envelope::Err(err) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("err", err)?;
            }
        }
        state.end()
    }
}

impl<'de, T: DeserializeOwned, E: DeserializeOwned> Deserialize<'de> for Envelope<T, E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::deserialize(deserializer)?;
        let ok = match map.get("ok") {
            Some(Value::Bool(ok)) => *ok,
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "field `ok` must be a boolean, got {other}"
                )))
            }
            None => return Err(D::Error::missing_field("ok")),
        };

        if ok {
            let val = map
                .remove("val")
                .ok_or_else(|| D::Error::missing_field("val"))?;
            T::deserialize(val).map(Envelope::Ok).map_err(D::Error::custom)
        } else {
            let err = map
                .remove("err")
                .ok_or_else(|| D::Error::missing_field("err"))?;
            E::deserialize(err).map(Envelope::Err).map_err(D::Error::custom)
        }
    }
}
