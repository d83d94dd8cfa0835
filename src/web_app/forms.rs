// web_app/forms.rs - Input collection for the edit, filter and login forms
//
// Forms keep the raw text the user typed. Numbers are parsed here, at the input
// boundary, so the rest of the crate only ever sees typed values.

use crate::web_app::error::ValidationError;
use crate::web_app::model::{
    parse_decimal, parse_integer, Credentials, FilterCriteria, Product, ProductDraft, ProductId,
};

/// Lifecycle shared by every submit-style form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Error(String),
}

impl FormStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, FormStatus::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FormStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Raw product fields as typed into the modal
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub image_url: String,
}

impl ProductForm {
    /// Pre-fill the form from an existing product
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            image_url: product.image_url.clone(),
        }
    }

    /// Check required fields and parse numbers
    ///
    /// Fields are checked in display order so the first empty one is reported.
    pub fn validate(&self) -> Result<ProductDraft, ValidationError> {
        let name = required("name", &self.name)?;
        let price = required("price", &self.price)?;
        let stock = required("stock", &self.stock)?;
        let image_url = required("image_url", &self.image_url)?;

        Ok(ProductDraft {
            name: name.to_string(),
            price: parse_decimal("price", price)?,
            stock: parse_integer("stock", stock)?,
            image_url: image_url.to_string(),
        })
    }
}

/// Editable fields of the product modal, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Price,
    Stock,
    ImageUrl,
}

impl ProductField {
    pub const ALL: [ProductField; 4] = [
        ProductField::Name,
        ProductField::Price,
        ProductField::Stock,
        ProductField::ImageUrl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProductField::Name => "Name",
            ProductField::Price => "Price",
            ProductField::Stock => "Stock",
            ProductField::ImageUrl => "Image URL",
        }
    }

    /// HTML input type used to render the field
    pub fn input_type(&self) -> &'static str {
        match self {
            ProductField::Name => "text",
            ProductField::Price | ProductField::Stock => "number",
            ProductField::ImageUrl => "url",
        }
    }
}

impl ProductForm {
    pub fn get(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Price => &self.price,
            ProductField::Stock => &self.stock,
            ProductField::ImageUrl => &self.image_url,
        }
    }

    pub fn set(&mut self, field: ProductField, value: String) {
        match field {
            ProductField::Name => self.name = value,
            ProductField::Price => self.price = value,
            ProductField::Stock => self.stock = value,
            ProductField::ImageUrl => self.image_url = value,
        }
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

/// Create or update request produced by a valid form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveRequest {
    /// `None` creates a new product, `Some(id)` updates that product
    pub target: Option<ProductId>,
    pub draft: ProductDraft,
}

impl SaveRequest {
    pub fn is_create(&self) -> bool {
        self.target.is_none()
    }
}

/// Create/edit modal state
///
/// The draft is a private copy; the list only changes once the backend accepts it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductEditor {
    pub form: ProductForm,
    target: Option<ProductId>,
    status: FormStatus,
}

impl ProductEditor {
    pub fn create() -> Self {
        ProductEditor::default()
    }

    pub fn edit(product: &Product) -> Self {
        ProductEditor {
            form: ProductForm::from_product(product),
            target: Some(product.id),
            status: FormStatus::Idle,
        }
    }

    pub fn target(&self) -> Option<ProductId> {
        self.target
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn title(&self) -> &'static str {
        if self.target.is_some() {
            "Edit Product"
        } else {
            "Add Product"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.target.is_some() {
            "Update"
        } else {
            "Add"
        }
    }

    /// Validate and move to `Submitting`
    ///
    /// Returns `None` while a submission is already running or when the form is
    /// invalid (the status then carries the validation message).
    pub fn begin_submit(&mut self) -> Option<SaveRequest> {
        if self.status.is_submitting() {
            return None;
        }
        match self.form.validate() {
            Ok(draft) => {
                self.status = FormStatus::Submitting;
                Some(SaveRequest {
                    target: self.target,
                    draft,
                })
            }
            Err(err) => {
                self.status = FormStatus::Error(err.to_string());
                None
            }
        }
    }

    /// Record the backend's answer; returns true when the modal can close
    pub fn finish_submit<T, E: std::fmt::Display>(&mut self, result: &Result<T, E>) -> bool {
        match result {
            Ok(_) => {
                self.status = FormStatus::Idle;
                true
            }
            Err(err) => {
                self.status = FormStatus::Error(err.to_string());
                false
            }
        }
    }
}

/// Raw filter inputs (name plus optional numeric ranges)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub name: String,
    pub price_min: String,
    pub price_max: String,
    pub stock_min: String,
    pub stock_max: String,
}

impl FilterForm {
    pub fn parse(&self) -> Result<FilterCriteria, ValidationError> {
        Ok(FilterCriteria::default()
            .with_name(self.name.as_str())
            .with_price_range(
                optional(&self.price_min, |raw| parse_decimal("price_min", raw))?,
                optional(&self.price_max, |raw| parse_decimal("price_max", raw))?,
            )
            .with_stock_range(
                optional(&self.stock_min, |raw| parse_integer("stock_min", raw))?,
                optional(&self.stock_max, |raw| parse_integer("stock_max", raw))?,
            ))
    }

    pub fn clear(&mut self) {
        *self = FilterForm::default();
    }
}

fn optional<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

/// Which account action the login widget performs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Login => write!(f, "Login"),
            AuthMode::Register => write!(f, "Register"),
        }
    }
}

/// Login / register widget state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub mode: AuthMode,
    status: FormStatus,
}

impl LoginForm {
    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.status.is_submitting() {
            return None;
        }
        let credentials = required("username", &self.username).and_then(|username| {
            // passwords are sent as typed
            if self.password.is_empty() {
                Err(ValidationError::MissingField("password"))
            } else {
                Ok(Credentials {
                    username: username.to_string(),
                    password: self.password.clone(),
                })
            }
        });
        match credentials {
            Ok(credentials) => {
                self.status = FormStatus::Submitting;
                Some(credentials)
            }
            Err(err) => {
                self.status = FormStatus::Error(err.to_string());
                None
            }
        }
    }

    pub fn finish_submit<T, E: std::fmt::Display>(&mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => {
                self.password.clear();
                self.status = FormStatus::Idle;
            }
            Err(err) => self.status = FormStatus::Error(err.to_string()),
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = FormStatus::Error(message.into());
    }
}
