//! Presentation of the catalog view as plain text or a standalone HTML page.

use catalog_core::{format_price, CatalogSummary, DomainError, Product, ViewState};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("cannot summarise products: {0}")]
    Summary(#[from] DomainError),
}

/// Product prepared for display. Prices are formatted here so templates
/// never see raw decimals.
#[derive(Debug, Serialize)]
struct ProductCard<'a> {
    id: u64,
    name: &'a str,
    price: String,
}

#[derive(Debug, Serialize)]
struct SummaryLine {
    count: usize,
    total_value: String,
}

pub struct CatalogRenderer {
    tera: Tera,
}

impl CatalogRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("header.txt", include_str!("../templates/header.txt")),
            ("products.txt", include_str!("../templates/products.txt")),
            ("loading.txt", include_str!("../templates/loading.txt")),
            ("error.txt", include_str!("../templates/error.txt")),
            ("products.html", include_str!("../templates/products.html")),
            ("page.html", include_str!("../templates/page.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Title block for text output. HTML pages carry their own header.
    pub fn render_header(&self) -> Result<String, RenderError> {
        Ok(self.tera.render("header.txt", &Context::new())?)
    }

    pub fn render_products(
        &self,
        products: &[Product],
        format: OutputFormat,
    ) -> Result<String, RenderError> {
        self.render_view(&ViewState::Loaded { products: products.to_vec() }, format, false)
    }

    /// Renders whichever state the view is in. `retry_hint` adds the prompt
    /// telling the user how to retry from the error state.
    pub fn render_view(
        &self,
        state: &ViewState,
        format: OutputFormat,
        retry_hint: bool,
    ) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("status", state.status().as_str());
        context.insert("retry_hint", &retry_hint);

        match state {
            ViewState::Loading => {}
            ViewState::Error { message } => context.insert("message", message),
            ViewState::Loaded { products } => {
                let summary = CatalogSummary::of(products)?;
                let cards: Vec<ProductCard<'_>> = products
                    .iter()
                    .map(|product| ProductCard {
                        id: product.id.0,
                        name: &product.name,
                        price: format_price(product.price),
                    })
                    .collect();
                context.insert("products", &cards);
                context.insert(
                    "summary",
                    &SummaryLine {
                        count: summary.count,
                        total_value: format_price(summary.total_value),
                    },
                );
            }
        }

        let template = match (format, state) {
            (OutputFormat::Html, _) => "page.html",
            (OutputFormat::Text, ViewState::Loading) => "loading.txt",
            (OutputFormat::Text, ViewState::Error { .. }) => "error.txt",
            (OutputFormat::Text, ViewState::Loaded { .. }) => "products.txt",
        };

        Ok(self.tera.render(template, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::{Catalog, DomainError, Product, ViewState};
    use rust_decimal::Decimal;

    use super::{CatalogRenderer, OutputFormat, RenderError};

    fn renderer() -> CatalogRenderer {
        CatalogRenderer::new().expect("templates parse")
    }

    #[test]
    fn empty_catalog_shows_placeholder_without_footer() {
        let output = renderer().render_products(&[], OutputFormat::Text).expect("render");

        assert!(output.contains("No products found"));
        assert!(!output.contains("Total Products"));
        assert!(!output.contains("Total Value"));
    }

    #[test]
    fn builtin_catalog_lists_cards_and_totals() {
        let catalog = Catalog::builtin().expect("builtin catalog is valid");

        let output =
            renderer().render_products(catalog.products(), OutputFormat::Text).expect("render");

        assert!(output.contains("[1] Laptop"));
        assert!(output.contains("$999.99"));
        assert!(output.contains("[6] USB-C Cable"));
        assert!(output.contains("$9.99"));
        assert!(output.contains("Total Products: 6"));
        assert!(output.contains("Total Value: $2459.94"));
        assert!(output.find("Laptop") < output.find("USB-C Cable"));
    }

    #[test]
    fn rounding_happens_only_at_display() {
        let products = vec![
            Product::new(1, "Washer", Decimal::new(5, 3)),
            Product::new(2, "Nut", Decimal::new(5, 3)),
        ];

        let output = renderer().render_products(&products, OutputFormat::Text).expect("render");

        assert!(output.contains("    $0.01"));
        assert!(output.contains("Total Value: $0.01"));
    }

    #[test]
    fn overflowing_total_is_reported_as_render_error() {
        let products = vec![
            Product::new(1, "Vault", Decimal::MAX),
            Product::new(2, "Second vault", Decimal::MAX),
        ];

        let result = renderer().render_products(&products, OutputFormat::Text);

        assert!(matches!(
            result,
            Err(RenderError::Summary(DomainError::TotalOverflow { count: 2 }))
        ));
    }

    #[test]
    fn whole_prices_keep_two_decimals() {
        let products = vec![Product::new(1, "Desk", Decimal::new(100, 0))];

        let output = renderer().render_products(&products, OutputFormat::Text).expect("render");

        assert!(output.contains("$100.00"));
    }

    #[test]
    fn text_header_names_the_catalog() {
        let output = renderer().render_header().expect("render");

        assert!(output.starts_with("Product Catalog"));
    }

    #[test]
    fn html_loading_page_keeps_header_and_footer() {
        let output =
            renderer().render_view(&ViewState::Loading, OutputFormat::Html, false).expect("render");

        assert!(output.contains("<h1>Product Catalog</h1>"));
        assert!(output.contains("Loading products..."));
        assert!(output.contains("<footer class=\"page-footer\">"));
        assert!(output.find("</main>") < output.find("<footer class=\"page-footer\">"));
    }

    #[test]
        fn loading_view_shows_indicator_only() {
        let output =
            renderer().render_view(&ViewState::Loading, OutputFormat::Text, false).expect("render");

        assert!(output.contains("Loading products..."));
        assert!(!output.contains("Total"));
    }

    #[test]
    fn error_view_shows_message_and_optional_hint() {
        let state = ViewState::Error { message: "Failed to fetch products".to_string() };

        let with_hint = renderer().render_view(&state, OutputFormat::Text, true).expect("render");
        let without_hint =
            renderer().render_view(&state, OutputFormat::Text, false).expect("render");

        assert!(with_hint.contains("Error"));
        assert!(with_hint.contains("Failed to fetch products"));
        assert!(with_hint.contains("Press Enter to try again"));
        assert!(!without_hint.contains("Press Enter to try again"));
        assert!(!with_hint.contains("No products found"));
    }

    #[test]
    fn html_page_escapes_product_names() {
        let products = vec![Product::new(1, "<b>Bold</b> & Co", Decimal::new(1_050, 2))];

        let output = renderer().render_products(&products, OutputFormat::Html).expect("render");

        assert!(output.contains("<h1>Product Catalog</h1>"));
        assert!(output.contains("&lt;b&gt;Bold&lt;&#x2F;b&gt; &amp; Co"));
        assert!(output.contains("$10.50"));
        assert!(output.contains("Total Products: 1"));
    }

    #[test]
    fn html_error_page_has_no_product_grid() {
        let state = ViewState::Error { message: "connection refused".to_string() };

        let output = renderer().render_view(&state, OutputFormat::Html, true).expect("render");

        assert!(output.contains("connection refused"));
        assert!(output.contains("Try Again"));
        assert!(!output.contains("class=\"products-grid\""));
        assert!(output.contains("<footer class=\"page-footer\">"));
    }
}
