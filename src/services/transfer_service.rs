//! Transfer service - validation and execution of balance transfers.
//!
//! This service handles:
//! - Field validation that accumulates every applicable error message
//! - Recipient lookup
//! - Handing the validated transfer to the store as one atomic unit
//!
//! # Error Policy
//!
//! Unlike sign-up and sign-in, transfer validation never short-circuits: all
//! checks run and the client receives the complete list of messages.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    error::AppError,
    models::{
        transaction::{SentTransaction, TransferRequest},
        user::User,
    },
    store::Store,
};

/// Smallest amount that may be sent (one cent).
pub const MIN_TRANSFER_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Balances are stored with two fractional digits.
const AMOUNT_SCALE: u32 = 2;

/// A transfer that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOrder {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub amount: Decimal,
}

/// Interpret a JSON value as an exact decimal amount.
fn parse_amount(value: Option<&Value>) -> Option<Decimal> {
    let Some(Value::Number(number)) = value else {
        return None;
    };

    if let Some(int) = number.as_i64() {
        return Some(Decimal::from(int));
    }
    if let Some(uint) = number.as_u64() {
        return Some(Decimal::from(uint));
    }
    let float = number.as_f64()?;
    // Shortest round-trip representation, so 0.1 parses as exactly 0.1
    match Decimal::from_str(&float.to_string()) {
        Ok(amount) => Some(amount),
        // Beyond Decimal's range: saturate so the minimum and balance checks reject it
        Err(_) if float.abs() < 1.0 => Some(Decimal::ZERO),
        Err(_) if float.is_sign_negative() => Some(Decimal::MIN),
        Err(_) => Some(Decimal::MAX),
    }
}

/// Interpret a JSON value as a user id. Only integral numbers qualify.
pub fn parse_recipient_id(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(number)) => number.as_i64(),
        _ => None,
    }
}

/// Run every transfer check and collect all failures.
///
/// `recipient_exists` is the result of looking up the requested recipient,
/// which the caller performs whenever `recipientId` is an integer.
pub fn validate_transfer(
    sender: &User,
    request: &TransferRequest,
    recipient_exists: bool,
) -> Result<TransferOrder, Vec<String>> {
    let mut errors = Vec::new();

    let amount = parse_amount(request.amount.as_ref());
    let recipient_is_number = matches!(request.recipient_id, Some(Value::Number(_)));
    let recipient_id = parse_recipient_id(request.recipient_id.as_ref());

    if amount.is_none() {
        errors.push("Amount missing or not a number.".to_string());
    }

    if let Some(amount) = amount {
        if amount < MIN_TRANSFER_AMOUNT {
            errors.push(format!(
                "You are not allowed to send less than {MIN_TRANSFER_AMOUNT}."
            ));
        }
    }

    if recipient_id == Some(sender.id) {
        errors.push("You cannot send money to yourself.".to_string());
    }

    if !recipient_is_number {
        errors.push("Recipient id missing or not a number.".to_string());
    }

    if let Some(amount) = amount {
        if amount > sender.balance {
            errors.push("You don't have enough money for this transaction.".to_string());
        }
        if amount.normalize().scale() > AMOUNT_SCALE {
            errors.push("Amount cannot have more than two decimal places.".to_string());
        }
    }

    if !recipient_exists {
        errors.push("Recipient does not exist.".to_string());
    }

    match (amount, recipient_id) {
        (Some(amount), Some(recipient_id)) if errors.is_empty() => Ok(TransferOrder {
            sender_id: sender.id,
            recipient_id,
            amount,
        }),
        _ => Err(errors),
    }
}

/// Validate and execute a transfer from `sender`.
///
/// # Process
///
/// 1. Look up the recipient (whenever the id is an integer)
/// 2. Run all validation checks against the sender snapshot
/// 3. Apply debit, credit and ledger insert atomically in the store, which
///    re-checks the balance under lock
///
/// # Errors
///
/// - `Validation`: one or more checks failed; nothing was written
/// - `InsufficientBalance`: a concurrent transfer spent the funds first
/// - `RecipientNotFound`: recipient vanished between lookup and lock
pub async fn execute_transfer(
    store: &dyn Store,
    sender: &User,
    request: TransferRequest,
) -> Result<SentTransaction, AppError> {
    let recipient = match parse_recipient_id(request.recipient_id.as_ref()) {
        Some(id) => store.find_user_by_id(id).await?,
        None => None,
    };

    let order = validate_transfer(sender, &request, recipient.is_some())
        .map_err(AppError::Validation)?;

    let sent = store
        .transfer(order.sender_id, order.recipient_id, order.amount)
        .await?;

    tracing::info!(
        transaction_id = sent.transaction.id,
        sender_id = order.sender_id,
        recipient_id = order.recipient_id,
        amount = %order.amount,
        "Transfer completed"
    );

    Ok(sent)
}
