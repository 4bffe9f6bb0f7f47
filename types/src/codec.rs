use dashmap::DashMap;
use serde::Serializer;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// An enumerated value that travels on the wire as its lowercase member name.
pub trait WireEnum: Copy + Send + Sync + 'static {
    /// Every member, in declaration order.
    const MEMBERS: &'static [Self];

    /// Declared member name, e.g. `ACCEPTED`.
    fn name(&self) -> &'static str;

    /// Member substituted for values that cannot be resolved.
    fn default_member() -> Option<Self> {
        None
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("cannot deserialize {target} from string \"{value}\": {reason}")]
    WeirdValue {
        value: String,
        target: &'static str,
        reason: &'static str,
    },
}

/// Name lookup for a single enum type.
#[derive(Debug)]
pub struct EnumResolver<T> {
    by_name: HashMap<&'static str, T>,
    default: Option<T>,
}

impl<T: WireEnum> EnumResolver<T> {
    fn construct() -> Self {
        let by_name = T::MEMBERS
            .iter()
            .map(|member| (member.name(), *member))
            .collect();
        Self {
            by_name,
            default: T::default_member(),
        }
    }

    pub fn find(&self, name: &str) -> Option<T> {
        self.by_name.get(name).copied()
    }

    pub fn default_value(&self) -> Option<T> {
        self.default
    }
}

/// Resolvers keyed by target type. Entries are built on first use and live as
/// long as the cache.
#[derive(Debug, Default)]
pub struct ResolverCache {
    resolvers: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolver<T: WireEnum>(&self) -> Arc<EnumResolver<T>> {
        let id = TypeId::of::<T>();
        let existing = self.resolvers.get(&id).map(|found| found.value().clone());
        let entry = match existing {
            Some(entry) => entry,
            // entry() holds the shard lock, so racing callers insert once
            None => self
                .resolvers
                .entry(id)
                .or_insert_with(|| {
                    let resolver: Arc<dyn Any + Send + Sync> =
                        Arc::new(EnumResolver::<T>::construct());
                    resolver
                })
                .value()
                .clone(),
        };
        entry
            .downcast::<EnumResolver<T>>()
            .unwrap_or_else(|_| Arc::new(EnumResolver::construct()))
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

/// Lowercase-on-the-wire enum codec backed by a shared resolver cache.
#[derive(Clone, Debug, Default)]
pub struct EnumCodec {
    cache: Arc<ResolverCache>,
}

impl EnumCodec {
    pub fn new(cache: Arc<ResolverCache>) -> Self {
        Self { cache }
    }

    pub fn encode<T: WireEnum>(value: T) -> String {
        value.name().to_lowercase()
    }

    /// Resolve a raw wire string. Blank or absent input yields `None`.
    pub fn decode<T: WireEnum>(&self, raw: Option<&str>) -> Result<Option<T>, CodecError> {
        let resolver = self.cache.resolver::<T>();
        resolve(&resolver, raw)
    }

    /// Resolve every element of a wire list. Blank elements are dropped.
    pub fn decode_all<T: WireEnum>(&self, raw: &[String]) -> Result<Vec<T>, CodecError> {
        let resolver = self.cache.resolver::<T>();
        let mut members = Vec::with_capacity(raw.len());
        for value in raw {
            if let Some(member) = resolve(&resolver, Some(value))? {
                members.push(member);
            }
        }
        Ok(members)
    }
}

fn resolve<T: WireEnum>(
    resolver: &EnumResolver<T>,
    raw: Option<&str>,
) -> Result<Option<T>, CodecError> {
    let value = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Ok(None),
    };

    // only lowercase input is accepted
    if value.to_lowercase() != value {
        return fallback(resolver, value, "not lowercase").map(Some);
    }

    match resolver
        .find(&value.to_uppercase())
        .or_else(|| resolver.find(value))
    {
        Some(member) => Ok(Some(member)),
        None => fallback(resolver, value, "unknown member").map(Some),
    }
}

fn fallback<T: WireEnum>(
    resolver: &EnumResolver<T>,
    value: &str,
    reason: &'static str,
) -> Result<T, CodecError> {
    resolver.default_value().ok_or_else(|| CodecError::WeirdValue {
        value: value.to_string(),
        target: type_name::<T>(),
        reason,
    })
}

/// `serialize_with` helper writing an enum as its lowercase name.
pub fn serialize_lowercase<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: WireEnum,
    S: Serializer,
{
    serializer.serialize_str(&EnumCodec::encode(*value))
}

/// `serialize_with` helper for optional enum fields.
pub fn serialize_lowercase_opt<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: WireEnum,
    S: Serializer,
{
    match value {
        Some(member) => serialize_lowercase(member, serializer),
        None => serializer.serialize_none(),
    }
}

/// `serialize_with` helper for enum lists.
pub fn serialize_lowercase_seq<T, S>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    T: WireEnum,
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|member| EnumCodec::encode(*member)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Colour {
        Red,
        DarkBlue,
    }

    impl WireEnum for Colour {
        const MEMBERS: &'static [Self] = &[Colour::Red, Colour::DarkBlue];

        fn name(&self) -> &'static str {
            match self {
                Colour::Red => "RED",
                Colour::DarkBlue => "DARK_BLUE",
            }
        }
    }

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Shade {
        Light,
        Unknown,
    }

    impl WireEnum for Shade {
        const MEMBERS: &'static [Self] = &[Shade::Light, Shade::Unknown];

        fn name(&self) -> &'static str {
            match self {
                Shade::Light => "LIGHT",
                Shade::Unknown => "UNKNOWN",
            }
        }

        fn default_member() -> Option<Self> {
            Some(Shade::Unknown)
        }
    }

    #[test]
    fn test_encode_lowercase() {
        assert_eq!(EnumCodec::encode(Colour::DarkBlue), "dark_blue");
        assert_eq!(EnumCodec::encode(Shade::Light), "light");
    }

    #[test]
    fn test_decode_lowercase_member() {
        let codec = EnumCodec::default();
        assert_eq!(codec.decode::<Colour>(Some("red")), Ok(Some(Colour::Red)));
        assert_eq!(
            codec.decode::<Colour>(Some("dark_blue")),
            Ok(Some(Colour::DarkBlue))
        );
    }

    #[test]
    fn test_decode_blank_is_absent() {
        let codec = EnumCodec::default();
        assert_eq!(codec.decode::<Colour>(None), Ok(None));
        assert_eq!(codec.decode::<Colour>(Some("")), Ok(None));
        assert_eq!(codec.decode::<Shade>(Some("   ")), Ok(None));
    }

    #[test]
    fn test_decode_unknown_without_default() {
        let codec = EnumCodec::default();
        match codec.decode::<Colour>(Some("green")) {
            Err(CodecError::WeirdValue { value, target, .. }) => {
                assert_eq!(value, "green");
                assert!(target.ends_with("Colour"));
            }
            other => panic!("expected weird value error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_with_default() {
        let codec = EnumCodec::default();
        assert_eq!(codec.decode::<Shade>(Some("dark")), Ok(Some(Shade::Unknown)));
    }

    #[test]
    fn test_decode_not_lowercase_is_violation() {
        let codec = EnumCodec::default();
        assert!(codec.decode::<Colour>(Some("Red")).is_err());
        assert_eq!(codec.decode::<Shade>(Some("LIGHT")), Ok(Some(Shade::Unknown)));
    }

    #[test]
    fn test_lowercase_round_trip() {
        let codec = EnumCodec::default();
        for member in Colour::MEMBERS {
            let wire = EnumCodec::encode(*member);
            let decoded = codec.decode::<Colour>(Some(&wire)).unwrap().unwrap();
            assert_eq!(decoded, *member);
            assert_eq!(EnumCodec::encode(decoded), member.name().to_lowercase());
        }
    }

    #[test]
    fn test_decode_all_list() {
        let cache = Arc::new(ResolverCache::new());
        let codec = EnumCodec::new(cache.clone());
        let raw = vec!["red".to_string(), "".to_string(), "dark_blue".to_string()];

        assert_eq!(
            codec.decode_all::<Colour>(&raw),
            Ok(vec![Colour::Red, Colour::DarkBlue])
        );
        assert_eq!(codec.decode_all::<Colour>(&[]), Ok(vec![]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_decode_all_rejects_unknown_element() {
        let codec = EnumCodec::default();
        let raw = vec!["red".to_string(), "green".to_string()];
        match codec.decode_all::<Colour>(&raw) {
            Err(CodecError::WeirdValue { value, .. }) => assert_eq!(value, "green"),
            other => panic!("expected weird value error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_all_uses_default_member() {
        let codec = EnumCodec::default();
        let raw = vec!["light".to_string(), "LIGHT".to_string(), "dim".to_string()];
        assert_eq!(
            codec.decode_all::<Shade>(&raw),
            Ok(vec![Shade::Light, Shade::Unknown, Shade::Unknown])
        );
    }

    #[test]
    fn test_resolver_cached_per_type() {
        let cache = Arc::new(ResolverCache::new());
        let codec = EnumCodec::new(cache.clone());
        assert!(cache.is_empty());

        codec.decode::<Colour>(Some("red")).unwrap();
        codec.decode::<Colour>(Some("dark_blue")).unwrap();
        assert_eq!(cache.len(), 1);

        codec.decode::<Shade>(Some("light")).unwrap();
        assert_eq!(cache.len(), 2);

        let first = cache.resolver::<Colour>();
        let second = cache.resolver::<Colour>();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_resolver_concurrent_population() {
        let cache = Arc::new(ResolverCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let codec = EnumCodec::new(cache.clone());
                thread::spawn(move || codec.decode::<Colour>(Some("red")))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(Some(Colour::Red)));
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_serialize_helpers() {
        #[derive(serde::Serialize)]
        struct Body {
            #[serde(serialize_with = "serialize_lowercase")]
            colour: Colour,
            #[serde(
                serialize_with = "serialize_lowercase_opt",
                skip_serializing_if = "Option::is_none"
            )]
            shade: Option<Shade>,
            #[serde(serialize_with = "serialize_lowercase_seq")]
            palette: Vec<Colour>,
        }

        let body = Body {
            colour: Colour::DarkBlue,
            shade: None,
            palette: vec![Colour::Red, Colour::DarkBlue],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"colour":"dark_blue","palette":["red","dark_blue"]}"#
        );
    }
}
