use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::Category;
use crate::domain::product::{NewProduct, StockAdjustment, StockDirection};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The provided price could not be parsed or is negative.
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
    /// Supplied identifier field could not be parsed.
    #[error("invalid {field} `{value}`")]
    InvalidIdentifier { field: &'static str, value: String },
    /// The uploaded CSV is missing required columns.
    #[error("upload is missing the required `nazwa`, `liczba` or `cena` headers")]
    MissingRequiredHeaders,
    /// A CSV row did not include a product name.
    #[error("row {row} is missing a product name")]
    UploadMissingName { row: usize },
    /// A CSV row contained an invalid quantity.
    #[error("row {row} has invalid quantity `{value}`")]
    UploadInvalidQuantity { row: usize, value: String },
    /// A CSV row contained an invalid price.
    #[error("row {row} has invalid price `{value}`")]
    UploadInvalidPrice { row: usize, value: String },
    /// A CSV row referenced a category that does not exist.
    #[error("row {row} references unknown category `{value}`")]
    UploadUnknownCategory { row: usize, value: String },
    /// The uploaded CSV did not contain any usable products.
    #[error("upload contains no products")]
    EmptyUpload,
    /// The uploaded file could not be read.
    #[error("error reading uploaded file")]
    FileReadError,
    /// CSV parsing failures.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl From<std::io::Error> for ProductFormError {
    fn from(_: std::io::Error) -> Self {
        ProductFormError::FileReadError
    }
}

/// Form payload emitted when submitting the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    /// Name entered by the user.
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Initial stock level. The store never accepts a product without stock.
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Price as typed by the user, e.g. `12.50` or `12,50`.
    pub price: String,
    /// Optional category identifier in string form (empty when "Brak").
    #[serde(default)]
    pub category_id: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents = parse_price_grosze(&self.price)?;
        let category_id = parse_optional_i32(self.category_id, "category")?;

        let mut new_product = NewProduct::new(sanitized_name, self.quantity, price_cents);
        if let Some(category_id) = category_id {
            new_product = new_product.with_category_id(category_id);
        }

        Ok(new_product)
    }
}

/// Form payload emitted by the per-row add/subtract stock controls.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockForm {
    /// Number of units to move, always entered as a positive magnitude.
    #[validate(range(min = 1))]
    pub amount: i32,
    /// Which of the two buttons was pressed.
    pub direction: StockDirection,
}

impl AdjustStockForm {
    /// Validates the payload into a domain `StockAdjustment`.
    pub fn into_adjustment(self) -> ProductFormResult<StockAdjustment> {
        self.validate()?;

        Ok(StockAdjustment {
            amount: self.amount,
            direction: self.direction,
        })
    }
}

#[derive(MultipartForm)]
/// Multipart form for uploading a CSV file with new products.
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    /// Uploaded CSV file containing product data.
    pub csv: TempFile,
}

#[derive(Debug, Deserialize)]
struct ProductCsvRow {
    nazwa: String,
    liczba: String,
    cena: String,
    #[serde(default)]
    kategoria: Option<String>,
}

impl UploadProductsForm {
    /// Parse the uploaded CSV into domain `NewProduct` values, resolving
    /// category names against `categories`.
    pub fn into_new_products(
        &mut self,
        categories: &[Category],
    ) -> ProductFormResult<Vec<NewProduct>> {
        self.csv.file.rewind()?;
        parse_products(self.csv.file.by_ref(), categories)
    }
}

fn parse_products<R: Read>(
    reader: R,
    categories: &[Category],
) -> ProductFormResult<Vec<NewProduct>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    {
        let headers = csv_reader.headers()?;
        for required in ["nazwa", "liczba", "cena"] {
            if !headers.iter().any(|header| header.eq_ignore_ascii_case(required)) {
                return Err(ProductFormError::MissingRequiredHeaders);
            }
        }
    }

    let mut products = Vec::new();

    for (index, row) in csv_reader.deserialize::<ProductCsvRow>().enumerate() {
        let row_number = index + 2; // account for header row
        let record = row?;

        let name = sanitize_inline_text(&record.nazwa);
        if name.is_empty() {
            return Err(ProductFormError::UploadMissingName { row: row_number });
        }

        let quantity = match record.liczba.trim().parse::<i32>() {
            Ok(value) if value >= 1 => value,
            _ => {
                return Err(ProductFormError::UploadInvalidQuantity {
                    row: row_number,
                    value: record.liczba,
                });
            }
        };

        let price_cents = match parse_price_grosze(&record.cena) {
            Ok(value) => value,
            Err(_) => {
                return Err(ProductFormError::UploadInvalidPrice {
                    row: row_number,
                    value: record.cena,
                });
            }
        };

        let category_id = match record.kategoria.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => {
                match categories.iter().find(|category| category.name == value) {
                    Some(category) => Some(category.id),
                    None => {
                        return Err(ProductFormError::UploadUnknownCategory {
                            row: row_number,
                            value: value.to_string(),
                        });
                    }
                }
            }
            _ => None,
        };

        let mut product = NewProduct::new(name, quantity, price_cents);
        if let Some(category_id) = category_id {
            product = product.with_category_id(category_id);
        }

        products.push(product);
    }

    if products.is_empty() {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(products)
}

fn parse_optional_i32(
    value: Option<String>,
    field: &'static str,
) -> ProductFormResult<Option<i32>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                match trimmed.parse::<i32>() {
                    Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
                    Ok(_) => Ok(None),
                    Err(_) => Err(ProductFormError::InvalidIdentifier {
                        field,
                        value: trimmed.to_string(),
                    }),
                }
            }
        }
    }
}

/// Parse a user-entered price into grosze. Accepts `12`, `12.5`, `12.50` and
/// the decimal comma form `12,50`; at most two fraction digits.
fn parse_price_grosze(input: &str) -> ProductFormResult<i32> {
    let trimmed = input.trim();

    let invalid = || ProductFormError::InvalidPrice {
        value: trimmed.to_string(),
    };

    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(invalid());
    }

    let (whole, fraction) = match trimmed.split_once(['.', ',']) {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }

    if fraction.len() > 2
        || !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    let grosze = whole * 100 + fraction;
    i32::try_from(grosze).map_err(|_| invalid())
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::io::Cursor;

    fn category(id: i32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn add_product_form_converts_successfully() {
        let form = AddProductForm {
            name: "  Młotek   stolarski ".to_string(),
            quantity: 5,
            price: "24,99".to_string(),
            category_id: Some(" 3 ".to_string()),
        };

        let new_product = form.into_new_product().expect("expected success");

        assert_eq!(new_product.name, "Młotek stolarski");
        assert_eq!(new_product.quantity, 5);
        assert_eq!(new_product.price_cents, 2499);
        assert_eq!(new_product.category_id, Some(3));
    }

    #[test]
    fn add_product_form_rejects_empty_name() {
        let form = AddProductForm {
            name: "   ".to_string(),
            quantity: 1,
            price: "1.00".to_string(),
            category_id: None,
        };

        let result = form.into_new_product();

        assert!(matches!(result, Err(ProductFormError::EmptyName)));
    }

    #[test]
    fn add_product_form_rejects_zero_quantity() {
        let form = AddProductForm {
            name: "Młotek".to_string(),
            quantity: 0,
            price: "1.00".to_string(),
            category_id: None,
        };

        let result = form.into_new_product();

        assert!(matches!(result, Err(ProductFormError::Validation(_))));
    }

    #[test]
    fn add_product_form_rejects_negative_price() {
        let form = AddProductForm {
            name: "Młotek".to_string(),
            quantity: 1,
            price: "-2.50".to_string(),
            category_id: None,
        };

        let result = form.into_new_product();

        assert!(matches!(
            result,
            Err(ProductFormError::InvalidPrice { value }) if value == "-2.50"
        ));
    }

    #[test]
    fn add_product_form_treats_blank_category_as_none() {
        let form = AddProductForm {
            name: "Młotek".to_string(),
            quantity: 1,
            price: "0".to_string(),
            category_id: Some("".to_string()),
        };

        let new_product = form.into_new_product().expect("expected success");

        assert!(new_product.category_id.is_none());
    }

    #[test]
    fn parse_price_grosze_handles_common_forms() {
        assert_eq!(parse_price_grosze("12").unwrap(), 1200);
        assert_eq!(parse_price_grosze("12.5").unwrap(), 1250);
        assert_eq!(parse_price_grosze("12.50").unwrap(), 1250);
        assert_eq!(parse_price_grosze("12,05").unwrap(), 1205);
        assert_eq!(parse_price_grosze("0").unwrap(), 0);
        assert_eq!(parse_price_grosze(".99").unwrap(), 99);
    }

    #[test]
    fn parse_price_grosze_rejects_malformed_input() {
        assert!(parse_price_grosze("").is_err());
        assert!(parse_price_grosze("abc").is_err());
        assert!(parse_price_grosze("1.234").is_err());
        assert!(parse_price_grosze("1.2.3").is_err());
        assert!(parse_price_grosze("-1").is_err());
    }

    #[test]
    fn adjust_stock_form_rejects_non_positive_amount() {
        let form = AdjustStockForm {
            amount: 0,
            direction: StockDirection::Add,
        };

        let result = form.into_adjustment();

        assert!(matches!(result, Err(ProductFormError::Validation(_))));
    }

    #[test]
    fn upload_parses_rows_and_resolves_categories() {
        let csv = "nazwa,liczba,cena,kategoria\nMłotek,5,24.99,Narzędzia\nGwoździe,100,9,\n";
        let categories = vec![category(7, "Narzędzia")];

        let products = parse_products(Cursor::new(csv), &categories).expect("should parse");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Młotek");
        assert_eq!(products[0].quantity, 5);
        assert_eq!(products[0].price_cents, 2499);
        assert_eq!(products[0].category_id, Some(7));

        assert_eq!(products[1].name, "Gwoździe");
        assert_eq!(products[1].price_cents, 900);
        assert!(products[1].category_id.is_none());
    }

    #[test]
    fn upload_rejects_missing_headers() {
        let csv = "nazwa,cena\nMłotek,24.99\n";

        let result = parse_products(Cursor::new(csv), &[]);

        assert!(matches!(
            result,
            Err(ProductFormError::MissingRequiredHeaders)
        ));
    }

    #[test]
    fn upload_rejects_unknown_category() {
        let csv = "nazwa,liczba,cena,kategoria\nMłotek,5,24.99,Ogród\n";
        let categories = vec![category(7, "Narzędzia")];

        let result = parse_products(Cursor::new(csv), &categories);

        assert!(matches!(
            result,
            Err(ProductFormError::UploadUnknownCategory { row: 2, value }) if value == "Ogród"
        ));
    }

    #[test]
    fn upload_rejects_zero_quantity_row() {
        let csv = "nazwa,liczba,cena\nMłotek,0,24.99\n";

        let result = parse_products(Cursor::new(csv), &[]);

        assert!(matches!(
            result,
            Err(ProductFormError::UploadInvalidQuantity { row: 2, .. })
        ));
    }

    #[test]
    fn upload_rejects_empty_file() {
        let csv = "nazwa,liczba,cena\n";

        let result = parse_products(Cursor::new(csv), &[]);

        assert!(matches!(result, Err(ProductFormError::EmptyUpload)));
    }
}
