use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Deserialize a value, falling back to its default when it is `null`
pub fn deserialize_or_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

/// Deserialize a value, reading `null` and anything of the wrong shape as `None`
pub fn deserialize_lenient<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt: Option<Lenient<T>> = Option::deserialize(deserializer)?;
    Ok(match opt {
        Some(Lenient::Valid(value)) => Some(value),
        Some(Lenient::Invalid(_)) | None => None,
    })
}

/// Deserialize a heading level, reading `null` and non-integers as 1
pub fn deserialize_level<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient(deserializer)?.unwrap_or(1))
}
