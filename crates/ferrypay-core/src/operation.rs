//! Upstream operations offered by the mPAY ONE processor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::payload::Payload;

/// Fields every payment-initiating request must carry.
const PAYMENT_FIELDS: &[&str] = &["merchant_id", "order_id", "amount", "currency"];

/// `refund_type` value that requires an amount.
pub const REFUND_TYPE_REFUND: &str = "REFUND";

/// `refund_type` value for cancelling an unsettled payment.
pub const REFUND_TYPE_VOID: &str = "VOID";

/// An upstream call the gateway can make on behalf of the booking site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Card payment order (redirects to the hosted card page).
    CreditCardPayment,
    /// PromptPay QR code generation.
    QrGenerate,
    /// Rabbit LINE Pay wallet payment.
    RabbitLinePayPayment,
    /// Card installment payment.
    InstallmentPayment,
    /// Internet banking transfer.
    InternetBankingPayment,
    /// Payment status inquiry.
    PaymentInquiry,
    /// Void or (partial) refund of a payment.
    VoidRefund,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::CreditCardPayment,
        Self::QrGenerate,
        Self::RabbitLinePayPayment,
        Self::InstallmentPayment,
        Self::InternetBankingPayment,
        Self::PaymentInquiry,
        Self::VoidRefund,
    ];

    /// Upstream path, relative to the processor base URL.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::CreditCardPayment => "/credit-card/payment",
            Self::QrGenerate => "/qr/generate",
            Self::RabbitLinePayPayment => "/rabbit-line-pay/payment",
            Self::InstallmentPayment => "/installment/payment",
            Self::InternetBankingPayment => "/internet-banking/payment",
            Self::PaymentInquiry => "/payment/inquiry",
            Self::VoidRefund => "/payment/void-refund",
        }
    }

    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreditCardPayment => "credit_card_payment",
            Self::QrGenerate => "qr_generate",
            Self::RabbitLinePayPayment => "rabbit_line_pay_payment",
            Self::InstallmentPayment => "installment_payment",
            Self::InternetBankingPayment => "internet_banking_payment",
            Self::PaymentInquiry => "payment_inquiry",
            Self::VoidRefund => "void_refund",
        }
    }

    /// Fields that must be present (with any value), in checking order.
    #[must_use]
    pub fn required_fields(self) -> Vec<&'static str> {
        let extra: &[&str] = match self {
            Self::CreditCardPayment | Self::QrGenerate => &[],
            Self::RabbitLinePayPayment => &["redirect_url"],
            Self::InstallmentPayment => &["redirect_url", "installment_plan", "installment_bank"],
            Self::InternetBankingPayment => &["redirect_url", "bank_code"],
            Self::PaymentInquiry => return vec!["merchant_id", "order_id"],
            Self::VoidRefund => return vec!["merchant_id", "order_id", "refund_type"],
        };
        PAYMENT_FIELDS.iter().chain(extra).copied().collect()
    }

    /// Check `payload` against this operation's field rules.
    ///
    /// Reports the first failing field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the missing field.
    pub fn validate(self, payload: &Payload) -> Result<(), ValidationError> {
        if let Some(field) = self
            .required_fields()
            .into_iter()
            .find(|field| !payload.contains(field))
        {
            return Err(ValidationError::missing(field));
        }

        if self == Self::VoidRefund
            && payload.get_str("refund_type") == Some(REFUND_TYPE_REFUND)
            && !payload.contains("amount")
        {
            return Err(ValidationError::conditional(
                "amount",
                "Amount is required for refund",
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationReason;

    fn payment_payload() -> Payload {
        Payload::new()
            .with("merchant_id", "MERCH-12345")
            .with("order_id", "ORD-2025001")
            .with("amount", 529.73)
            .with("currency", "THB")
    }

    #[test]
    fn endpoints_are_unique() {
        let mut endpoints: Vec<_> = Operation::ALL.iter().map(|op| op.endpoint()).collect();
        endpoints.sort_unstable();
        endpoints.dedup();
        assert_eq!(endpoints.len(), Operation::ALL.len());
    }

    #[test]
    fn card_and_qr_need_only_payment_fields() {
        for op in [Operation::CreditCardPayment, Operation::QrGenerate] {
            assert!(op.validate(&payment_payload()).is_ok());
        }
    }

    #[test]
    fn reports_first_missing_field() {
        let payload = Payload::new().with("merchant_id", "M1");
        let err = Operation::CreditCardPayment.validate(&payload).unwrap_err();

        assert_eq!(err.field, "order_id");
        assert_eq!(err.reason, ValidationReason::Missing);
    }

    #[test]
    fn null_value_counts_as_present() {
        let payload = payment_payload().with("amount", serde_json::Value::Null);
        assert!(Operation::QrGenerate.validate(&payload).is_ok());
    }

    #[test]
    fn wallet_and_bank_methods_need_redirect() {
        let err = Operation::RabbitLinePayPayment
            .validate(&payment_payload())
            .unwrap_err();
        assert_eq!(err.field, "redirect_url");

        let payload = payment_payload().with("redirect_url", "https://example.com/done");
        let err = Operation::InternetBankingPayment.validate(&payload).unwrap_err();
        assert_eq!(err.field, "bank_code");

        assert!(Operation::InternetBankingPayment
            .validate(&payload.with("bank_code", "SCB"))
            .is_ok());
    }

    #[test]
    fn installment_needs_plan_and_bank() {
        let payload = payment_payload()
            .with("redirect_url", "https://example.com/done")
            .with("installment_plan", "6");

        let err = Operation::InstallmentPayment.validate(&payload).unwrap_err();
        assert_eq!(err.field, "installment_bank");

        assert!(Operation::InstallmentPayment
            .validate(&payload.with("installment_bank", "KTC"))
            .is_ok());
    }

    #[test]
    fn inquiry_needs_only_identifiers() {
        let payload = Payload::new()
            .with("merchant_id", "M1")
            .with("order_id", "O1");
        assert!(Operation::PaymentInquiry.validate(&payload).is_ok());
    }

    #[test]
    fn refund_requires_amount_but_void_does_not() {
        let base = Payload::new()
            .with("merchant_id", "M1")
            .with("order_id", "O1");

        let void = base.clone().with("refund_type", REFUND_TYPE_VOID);
        assert!(Operation::VoidRefund.validate(&void).is_ok());

        let refund = base.with("refund_type", REFUND_TYPE_REFUND);
        let err = Operation::VoidRefund.validate(&refund).unwrap_err();
        assert_eq!(err.field, "amount");
        assert_eq!(err.to_string(), "Amount is required for refund");

        assert!(Operation::VoidRefund
            .validate(&refund.with("amount", 100.0))
            .is_ok());
    }

    #[test]
    fn serde_names_match_log_names() {
        for op in Operation::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, op.name());
        }
    }
}
