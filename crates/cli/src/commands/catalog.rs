//! Product and variant records read from catalog files.
//!
//! Files ending in `.yaml` or `.yml` are parsed as YAML, anything else as
//! JSON. Both use the catalog's camelCase field names.

use std::path::Path;

use marche_core::{Product, Variant};
use serde::de::DeserializeOwned;

use super::CliError;

/// Read and parse one catalog record.
async fn load<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|source| CliError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&content).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load a product file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_product(path: &Path) -> Result<Product, CliError> {
    let product: Product = load(path).await?;
    tracing::debug!(product_id = %product.id, path = %path.display(), "Loaded product");
    Ok(product)
}

/// Load a product file and an optional variant file.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub async fn load_item(
    product: &Path,
    variant: Option<&Path>,
) -> Result<(Product, Option<Variant>), CliError> {
    let product = load_product(product).await?;
    let variant = match variant {
        Some(path) => Some(load::<Variant>(path).await?),
        None => None,
    };
    Ok((product, variant))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use rust_decimal::Decimal;

    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("marche-cli-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_yaml_product_and_variant() {
        let dir = scratch_dir();
        let product_path = dir.join("boubou.yaml");
        std::fs::write(
            &product_path,
            "id: boubou\nname: Boubou brodé\nbasePrice: 45000\ncompareAtPrice: 52000\nimages:\n  - url: /img/boubou.jpg\n",
        )
        .unwrap();
        let variant_path = dir.join("boubou-l.yml");
        std::fs::write(
            &variant_path,
            "id: l-indigo\nprice: 47000\nstock: 3\nattributes:\n  - name: Size\n    value: L\n  - name: Color\n    value: Indigo\n",
        )
        .unwrap();

        let (product, variant) = load_item(&product_path, Some(&variant_path)).await.unwrap();
        assert_eq!(product.id.as_str(), "boubou");
        assert_eq!(product.compare_at_price, Some(Decimal::from(52_000)));
        assert_eq!(product.primary_image(), "/img/boubou.jpg");

        let variant = variant.unwrap();
        assert_eq!(variant.price, Decimal::from(47_000));
        assert_eq!(variant.label().as_deref(), Some("L / Indigo"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_load_json_product() {
        let dir = scratch_dir();
        let path = dir.join("savon.json");
        std::fs::write(
            &path,
            r#"{"id":"savon","name":"Savon noir","basePrice":"1500"}"#,
        )
        .unwrap();

        let product = load_product(&path).await.unwrap();
        assert_eq!(product.base_price, Decimal::from(1_500));
        assert!(product.images.is_empty());

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let err = load_product(Path::new("/nonexistent/marche/product.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_reported() {
        let dir = scratch_dir();
        let path = dir.join("broken.yaml");
        std::fs::write(&path, "id: [unclosed\n").unwrap();

        let err = load_product(&path).await.unwrap_err();
        assert!(matches!(err, CliError::Yaml { .. }));

        std::fs::remove_dir_all(dir).ok();
    }
}
