//! Request construction: turns a transaction kind and its inputs into a
//! [`FieldSet`].
//!
//! Caller supplied pairs are applied right after the base fields, so every
//! transaction specific write made afterwards takes precedence over them.

use bon::Builder;
use url::Url;

use crate::{
    errors::{Error, Result},
    fields::{Field, FieldSet, FieldValue},
    types::{CardInput, CardPresentation, Environment, Money, Subject, Tender, TransactionKind},
};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_ORDER_DESCRIPTION: &str = "Payflow order transaction";
pub const DEFAULT_INVOICE_NUMBER: &str = "INX123";

pub const SWIPED_ECR_HOST: &str = "MAGT";
pub const MAGTEK_CARD_TYPE: i64 = 1;
pub const REGISTERED_BY: &str = "PayPal";
pub const ENCRYPTION_BLOCK_TYPE: i64 = 1;

/// Per call transaction options.
#[derive(Builder, Debug, Clone, Default, PartialEq)]
pub struct TransactionOptions {
    /// Raw fields written before any transaction specific field.
    #[builder(default)]
    pub pairs: Vec<(String, FieldValue)>,
    #[builder(into)]
    pub currency: Option<String>,
    /// Overrides the configured environment for this call.
    pub test: Option<bool>,
    /// Client timeout in seconds sent to the gateway.
    pub timeout: Option<u64>,
    /// Idempotency id sent as `X-VPS-REQUEST-ID`.
    #[builder(into)]
    pub request_id: Option<String>,
    /// Skip the transport and answer with a synthetic approval.
    #[builder(default, with = || true)]
    pub mock: bool,
    /// Order description for express checkout.
    #[builder(into)]
    pub description: Option<String>,
    #[builder(into)]
    pub invoice_number: Option<String>,
    /// Express checkout token.
    #[builder(into)]
    pub order_id: Option<String>,
    #[builder(into)]
    pub payer_id: Option<String>,
    pub tax_amount: Option<Money>,
    pub total_item_amount: Option<Money>,
    pub discount_amount: Option<Money>,
    #[builder(default)]
    pub line_items: Vec<LineItem>,
    /// Base for the express checkout return and cancel URLs.
    pub return_base_url: Option<Url>,
}

impl TransactionOptions {
    /// Append a raw field pair.
    pub fn with_pair(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// The environment this call runs against.
    pub fn environment(&self, configured: Environment) -> Environment {
        self.test.map(Environment::from_test_flag).unwrap_or(configured)
    }

    fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    fn description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or(DEFAULT_ORDER_DESCRIPTION)
    }
}

/// An express checkout order line.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    #[builder(into)]
    pub name: String,
    /// Merchant item number.
    #[builder(into)]
    pub slug: String,
    #[builder(into)]
    pub price: Money,
    pub quantity: u32,
}

/// Build the fields for one transaction.
///
/// `amount` is only written when it is greater than zero. `subject` is the
/// card or prior transaction reference the kind acts on; kinds that act on
/// neither ignore it.
pub fn build(
    kind: TransactionKind,
    amount: Option<Money>,
    subject: Option<&Subject>,
    options: &TransactionOptions,
    environment: Environment,
) -> Result<FieldSet> {
    let mut fields = FieldSet::new();
    fields.set(Field::TrxType, kind.trx_type());
    if let Some(amount) = amount.filter(Money::is_positive) {
        fields.set(Field::Amount, amount);
    }
    for (key, value) in &options.pairs {
        fields.set_pair(key, value.clone())?;
    }

    match kind {
        TransactionKind::Sale | TransactionKind::Authorization | TransactionKind::Credit => {
            match subject {
                Some(Subject::Reference(reference)) => add_reference(&mut fields, reference),
                Some(Subject::Card(card)) => add_credit_card(&mut fields, card, options),
                None => return Err(Error::SubjectRequired(kind)),
            }
        }
        TransactionKind::Capture | TransactionKind::Void | TransactionKind::Inquire => {
            add_reference(&mut fields, require_reference(kind, subject)?);
        }
        TransactionKind::GenerateToken => add_generate_token(&mut fields, options, environment),
        TransactionKind::CheckoutDetails => add_checkout_details(&mut fields, options)?,
        TransactionKind::CheckoutPayment => add_checkout_payment(&mut fields, options)?,
        TransactionKind::PaypalSale => {
            let reference = require_reference(kind, subject)?;
            add_paypal_sale(&mut fields, reference, options);
        }
    }

    Ok(fields)
}

fn require_reference(kind: TransactionKind, subject: Option<&Subject>) -> Result<&str> {
    subject
        .and_then(Subject::as_reference)
        .ok_or(Error::ReferenceRequired(kind))
}

fn require_option<'a>(
    kind: TransactionKind,
    option: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or(Error::MissingOption { kind, option })
}

fn add_reference(fields: &mut FieldSet, reference: &str) {
    fields.set(Field::Tender, Tender::Card.code());
    fields.set(Field::OrigId, reference);
}

fn add_credit_card(fields: &mut FieldSet, card: &CardInput, options: &TransactionOptions) {
    fields.set(Field::Tender, Tender::Card.code());
    fields.set(Field::Currency, options.currency());
    fields.set(Field::CardType, card.card_type());

    match card.presentation() {
        CardPresentation::Encrypted => add_encrypted_card(fields, card),
        CardPresentation::Swiped => {
            fields.set(Field::Swipe, card.track2.as_deref().unwrap_or_default());
        }
        CardPresentation::Keyed => {
            fields.set(Field::Account, card.number.as_deref().unwrap_or_default());
            fields.set(Field::ExpDate, card.expiration_date());
            if let Some(code) = card.security_code() {
                fields.set(Field::Cvv2, code);
            }
        }
    }
}

fn add_encrypted_card(fields: &mut FieldSet, card: &CardInput) {
    let raw = |value: &Option<String>| value.clone().unwrap_or_default();

    fields.set(Field::SwipedEcrHost, SWIPED_ECR_HOST);
    fields.set(Field::EncTrack2, raw(&card.track2));
    fields.set(Field::EncMp, raw(&card.mp));
    fields.set(Field::DeviceSn, raw(&card.device_sn));
    fields.set(Field::MpStatus, raw(&card.mpstatus));
    fields.set(Field::EncryptionBlockType, ENCRYPTION_BLOCK_TYPE);
    fields.set(Field::RegisteredBy, REGISTERED_BY);
    fields.set(Field::Ksn, raw(&card.ksn));
    fields.set(Field::MagtekCardType, MAGTEK_CARD_TYPE);
}

fn add_generate_token(
    fields: &mut FieldSet,
    options: &TransactionOptions,
    environment: Environment,
) {
    let base = options
        .return_base_url
        .as_ref()
        .map(Url::as_str)
        .unwrap_or(environment.checkout_base())
        .trim_end_matches('/');

    fields.set(Field::Tender, Tender::Paypal.code());
    fields.set(Field::Action, TransactionKind::Sale.trx_type());
    fields.set(Field::ReturnUrl, format!("{base}/error"));
    fields.set(Field::CancelUrl, format!("{base}/cancel"));
    fields.set(Field::OrderDesc, options.description());
    fields.set(
        Field::InvoiceNumber,
        options
            .invoice_number
            .as_deref()
            .unwrap_or(DEFAULT_INVOICE_NUMBER),
    );
}

fn add_checkout_details(fields: &mut FieldSet, options: &TransactionOptions) -> Result<()> {
    let kind = TransactionKind::CheckoutDetails;
    let token = require_option(kind, "order_id", &options.order_id)?;

    fields.set(Field::Tender, Tender::Paypal.code());
    fields.set(Field::Action, kind.action().unwrap_or_default());
    fields.set(Field::Token, token);
    Ok(())
}

fn add_checkout_payment(fields: &mut FieldSet, options: &TransactionOptions) -> Result<()> {
    let kind = TransactionKind::CheckoutPayment;
    let token = require_option(kind, "order_id", &options.order_id)?;
    let payer_id = require_option(kind, "payer_id", &options.payer_id)?;
    let amount_or_zero =
        |amount: Option<Money>| amount.map(FieldValue::Money).unwrap_or(FieldValue::Integer(0));

    fields.set(Field::Tender, Tender::Paypal.code());
    fields.set(Field::Action, kind.action().unwrap_or_default());
    fields.set(Field::Token, token);
    fields.set(Field::PayerId, payer_id);
    fields.set(Field::OrderDesc, options.description());
    fields.set(Field::TaxAmount, amount_or_zero(options.tax_amount));
    fields.set(Field::ItemAmount, amount_or_zero(options.total_item_amount));
    fields.set(Field::FreightAmount, 0);
    fields.set(Field::Discount, amount_or_zero(options.discount_amount));
    fields.set(Field::Currency, options.currency());

    for (index, item) in options.line_items.iter().enumerate() {
        fields.set(Field::LineName(index), item.name.as_str());
        fields.set(Field::LineDesc(index), "");
        fields.set(Field::LineItemNumber(index), item.slug.as_str());
        fields.set(Field::LineCost(index), item.price);
        fields.set(Field::LineTaxAmount(index), 0);
        fields.set(Field::LineQuantity(index), item.quantity);
    }
    Ok(())
}

fn add_paypal_sale(fields: &mut FieldSet, reference: &str, options: &TransactionOptions) {
    fields.set(
        Field::Action,
        TransactionKind::PaypalSale.action().unwrap_or_default(),
    );
    fields.set(Field::Tender, Tender::Paypal.code());
    fields.set(Field::OrigId, reference);
    fields.set(Field::CaptureComplete, "Y");
    fields.set(Field::Currency, options.currency());
}
