//! Purchase pipeline
//!
//! One linear pass per request:
//! validate → plan signers → resolve accounts and build → fetch anchor →
//! compile and partially sign → encode. Any stage failing aborts the
//! request; nothing is retried and nothing is shared between requests
//! except the fee payer and the anchor source.

use crate::metrics::{metrics, InFlightGauge, Timer};
use crate::observability::CorrelationId;
use crate::security::validator;
use crate::structured_logging::PurchaseLogger;
use crate::tx_builder::{
    InstructionBuilder, PurchaseOrder, SignerCoordinator, TransactionBuilderError, TxAssembler,
    TxBuildOutput,
};
use crate::types::{BuyRequest, BuyResponse};
use crate::wallet::FeePayer;
use solana_sdk::pubkey::Pubkey;

#[derive(Debug, Clone)]
pub struct BuyEngine {
    fee_payer: &'static FeePayer,
    instructions: InstructionBuilder,
    assembler: TxAssembler,
}

impl BuyEngine {
    pub fn new(fee_payer: &'static FeePayer, assembler: TxAssembler) -> Self {
        Self {
            fee_payer,
            instructions: InstructionBuilder::default(),
            assembler,
        }
    }

    /// Replace the instruction builder (alternate program id or mint)
    pub fn with_instruction_builder(mut self, instructions: InstructionBuilder) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn fee_payer(&self) -> Pubkey {
        self.fee_payer.pubkey()
    }

    /// Validate a wire request into a purchase order
    pub fn order_from_request(request: &BuyRequest) -> Result<PurchaseOrder, TransactionBuilderError> {
        let buyer = validator::parse_buyer(&request.public_key)?;
        validator::validate_uri(&request.uri)?;
        validator::validate_reference(&request.reference)?;
        Ok(PurchaseOrder::new(
            request.id,
            request.uri.clone(),
            request.reference.clone(),
            buyer,
            request.amount,
        ))
    }

    /// Build the partially signed bundle for one order
    pub async fn buy(
        &self,
        order: &PurchaseOrder,
        logger: &PurchaseLogger,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let plan = SignerCoordinator::new(self.fee_payer.keypair()).plan(order.buyer)?;

        let accounts = self.instructions.resolve_accounts(order, &plan)?;
        logger.log_accounts_resolved(&accounts.listing, &accounts.object, &accounts.fraction);
        let ix = self.instructions.build_with_accounts(order, accounts)?;

        self.assembler.assemble(plan, &[ix]).await
    }

    /// Full request path: validation, build, encoding, metrics and logs
    pub async fn handle(
        &self,
        request: &BuyRequest,
        correlation_id: CorrelationId,
    ) -> Result<BuyResponse, TransactionBuilderError> {
        let m = metrics();
        m.buy_requests_total.inc();
        let _in_flight = InFlightGauge::enter(&m.buy_requests_in_flight);
        let timer = Timer::new();
        let logger = PurchaseLogger::new(correlation_id);

        let result = async {
            let order = Self::order_from_request(request)?;
            logger.log_request(&order);
            let output = self.buy(&order, &logger).await?;
            let transaction = output.to_base64()?;
            Ok::<_, TransactionBuilderError>((output, transaction))
        }
        .await;

        let latency_ms = (timer.elapsed_secs() * 1000.0) as u64;
        match result {
            Ok((output, transaction)) => {
                timer.observe_duration(&m.build_latency);
                m.buy_requests_succeeded.inc();
                logger.log_success(&output.anchor, output.pending_signers.len(), latency_ms);
                Ok(BuyResponse { transaction })
            }
            Err(e) => {
                m.record_failure(e.category());
                logger.log_failure(&e, latency_ms);
                Err(e)
            }
        }
    }
}
