use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

/// Build an OpenTelemetry [`Resource`] with the service name and optional attributes.
///
/// Convenience for the required resource metadata option:
///
/// ```
/// let resource = marmot_otel::service_resource(
///     "checkout",
///     [("service.version", "1.4.2"), ("deployment.environment", "production")],
/// );
/// ```
pub fn service_resource(
    service_name: &str,
    attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
) -> Resource {
    let mut kvs: Vec<KeyValue> = vec![KeyValue::new("service.name", service_name.to_owned())];

    for (key, value) in attributes {
        kvs.push(KeyValue::new(key.into(), value.into()));
    }

    Resource::builder().with_attributes(kvs).build()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn carries_service_name_and_attributes() {
        let resource = service_resource("checkout", [("deployment.environment", "demo")]);

        let attrs: HashMap<String, String> = resource
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        assert_eq!(attrs.get("service.name").map(String::as_str), Some("checkout"));
        assert_eq!(
            attrs.get("deployment.environment").map(String::as_str),
            Some("demo")
        );
    }
}
