use crate::data::models::payment_model::PaymentModel;

/// The vendor payment queue. The queue owns the transaction lifecycle; results
/// of submitted payments are reported through the vendor's own observer
/// mechanism.
pub trait PaymentQueueDatasource: Send + Sync {
    /// Whether the user is allowed to make payments on this device.
    fn can_make_payments(&self) -> bool;

    /// Submits a payment. Returns immediately.
    fn add_payment(&self, payment: PaymentModel);
}
