//! Calculator state machine.
//!
//! Interprets one instruction at a time, mutating the display, pending
//! operation and error fields, and delegating arithmetic to an
//! [`ArithmeticClient`]. Listeners are notified once per handled instruction.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use calc_core::error::LOCAL_ERROR;
use calc_core::number::{is_negative, negate};
use calc_core::state::INITIAL_DISPLAY;
use calc_core::{
    BinaryOp, CalcError, CalcResult, CalculatorSnapshot, ClientError, Instruction, Operation, Phase,
};

use crate::client::{ArithmeticClient, HttpArithmeticClient};
use crate::config::ClientConfig;

/// Callback invoked with the new snapshot after every handled instruction.
pub type Listener = Arc<dyn Fn(&CalculatorSnapshot) + Send + Sync>;

/// Operand and operation captured when an operator was chosen.
#[derive(Debug, Clone)]
struct Pending {
    operand: String,
    operation: Operation,
}

/// What to do with a remote result once it arrives.
#[derive(Debug, Clone, Copy)]
enum Resolution {
    /// `=` or `s`: drop the pending operation.
    Complete,
    /// A new binary operator chained after a pending one.
    Chain(BinaryOp),
}

/// A remote call prepared under the state lock, issued outside it.
#[derive(Debug)]
struct RemoteCall {
    op: Operation,
    a: String,
    b: String,
    resolution: Resolution,
}

/// Mutable calculator fields.
#[derive(Debug)]
struct CalculatorState {
    display: String,
    pending: Option<Pending>,
    reset_display: bool,
    error: Option<String>,
    processing: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: INITIAL_DISPLAY.to_string(),
            pending: None,
            reset_display: false,
            error: None,
            processing: false,
        }
    }
}

impl CalculatorState {
    fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            display: self.display.clone(),
            operand: self.pending.as_ref().map(|p| p.operand.clone()),
            operator: self.pending.as_ref().map(|p| p.operation.symbol()),
            reset_display: self.reset_display,
            error: self.error.clone(),
            processing: self.processing,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply an instruction. Returns the remote call to issue, if any.
    fn apply(&mut self, inst: Instruction) -> Option<RemoteCall> {
        match inst {
            Instruction::Digit(_) => self.enter_digit(inst.as_char()),
            Instruction::Decimal => self.enter_decimal(),
            Instruction::Clear => self.clear(),
            Instruction::Delete => self.delete(),
            Instruction::ToggleSign => {
                if self.error.is_none() {
                    self.display = negate(&self.display);
                }
            }
            Instruction::Sqrt => return self.sqrt(),
            Instruction::Binary(op) => return self.choose_operator(op),
            Instruction::Equals => return self.equals(),
        }
        None
    }

    fn enter_digit(&mut self, digit: char) {
        if self.error.is_some() {
            self.clear();
        }
        if self.reset_display {
            self.display = digit.to_string();
            self.reset_display = false;
        } else if self.display == INITIAL_DISPLAY {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    fn enter_decimal(&mut self) {
        if self.error.is_some() {
            self.clear();
        }
        if self.reset_display {
            self.display = "0.".to_string();
            self.reset_display = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    fn delete(&mut self) {
        if self.error.is_some() || self.reset_display {
            return;
        }
        if self.display.chars().count() > 1 {
            self.display.pop();
        } else {
            self.display = INITIAL_DISPLAY.to_string();
        }
    }

    /// Square root replaces any pending operation with itself.
    fn sqrt(&mut self) -> Option<RemoteCall> {
        if self.error.is_some() {
            return None;
        }
        if is_negative(&self.display) {
            self.error = Some(LOCAL_ERROR.to_string());
            self.reset_display = true;
            return None;
        }
        self.pending = Some(Pending {
            operand: self.display.clone(),
            operation: Operation::Sqrt,
        });
        Some(RemoteCall {
            op: Operation::Sqrt,
            a: self.display.clone(),
            b: String::new(),
            resolution: Resolution::Complete,
        })
    }

    fn choose_operator(&mut self, op: BinaryOp) -> Option<RemoteCall> {
        if self.error.is_some() {
            return None;
        }
        if !self.reset_display {
            if let Some(pending) = &self.pending {
                return Some(RemoteCall {
                    op: pending.operation,
                    a: pending.operand.clone(),
                    b: self.display.clone(),
                    resolution: Resolution::Chain(op),
                });
            }
        }
        self.set_pending(op);
        None
    }

    fn equals(&mut self) -> Option<RemoteCall> {
        if self.error.is_some() {
            return None;
        }
        let pending = self.pending.as_ref()?;
        Some(RemoteCall {
            op: pending.operation,
            a: pending.operand.clone(),
            b: self.display.clone(),
            resolution: Resolution::Complete,
        })
    }

    fn set_pending(&mut self, op: BinaryOp) {
        self.pending = Some(Pending {
            operand: self.display.clone(),
            operation: op.into(),
        });
        self.reset_display = true;
    }

    /// Fold a remote result back in. Failures leave the display and pending operation untouched.
    fn resolve(&mut self, resolution: Resolution, result: Result<String, ClientError>) {
        self.processing = false;
        match result {
            Ok(value) => {
                self.display = value;
                self.error = None;
                match resolution {
                    Resolution::Complete => {
                        self.pending = None;
                        self.reset_display = true;
                    }
                    Resolution::Chain(op) => self.set_pending(op),
                }
            }
            Err(e) => self.error = Some(e.display_message()),
        }
    }
}

/// State shared between calculator handles and in-flight requests.
struct Shared {
    session_id: Uuid,
    client: Arc<dyn ArithmeticClient>,
    state: Mutex<CalculatorState>,
    listener: Mutex<Option<Listener>>,
    updates: watch::Sender<CalculatorSnapshot>,
}

impl Shared {
    fn snapshot(&self) -> CalculatorSnapshot {
        lock(&self.state).snapshot()
    }

    /// Issue the remote call, publishing an interim snapshot if it is slow.
    async fn execute(
        &self,
        call: &RemoteCall,
        processing_hint: Option<Duration>,
    ) -> Result<String, ClientError> {
        tracing::debug!(
            session = %self.session_id,
            op = %call.op,
            a = %call.a,
            b = %call.b,
            "Remote calculation started"
        );

        let request = self.client.call(call.op, &call.a, &call.b);
        tokio::pin!(request);

        let result = match processing_hint {
            Some(delay) => tokio::select! {
                biased;
                result = &mut request => result,
                _ = tokio::time::sleep(delay) => {
                    self.notify(&self.snapshot());
                    request.await
                }
            },
            None => request.await,
        };

        if let Err(ref e) = result {
            tracing::warn!(session = %self.session_id, op = %call.op, "Remote calculation failed: {}", e);
        }
        result
    }

    /// Log the phase change and publish the resulting snapshot.
    fn finish(&self, inst: Instruction, before: Phase) -> CalculatorSnapshot {
        let snapshot = self.snapshot();
        let after = snapshot.phase();
        if before.can_transition_to(after) {
            tracing::debug!(
                session = %self.session_id,
                instruction = %inst,
                "Calculator phase: {:?} -> {:?}",
                before,
                after
            );
        } else {
            tracing::error!(
                session = %self.session_id,
                instruction = %inst,
                "Unexpected calculator phase change: {:?} -> {:?}",
                before,
                after
            );
        }

        self.notify(&snapshot);
        snapshot
    }

    fn notify(&self, snapshot: &CalculatorSnapshot) {
        self.updates.send_replace(snapshot.clone());
        let listener = lock(&self.listener).clone();
        if let Some(listener) = listener {
            listener(snapshot);
        }
    }
}

/// Calculator state machine backed by a remote arithmetic service.
///
/// All methods take `&self` and clones share one calculator. Only one
/// instruction may be in flight: `handle` fails with [`CalcError::Busy`]
/// while a remote call is pending. Remote calls run on their own task, so a
/// result is applied even if the `handle` future that started it is dropped.
#[derive(Clone)]
pub struct Calculator {
    shared: Arc<Shared>,
    processing_hint: Option<Duration>,
}

impl Calculator {
    /// Create a calculator using the given arithmetic client.
    pub fn new(client: Arc<dyn ArithmeticClient>) -> Self {
        let (updates, _) = watch::channel(CalculatorSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                session_id: Uuid::new_v4(),
                client,
                state: Mutex::new(CalculatorState::default()),
                listener: Mutex::new(None),
                updates,
            }),
            processing_hint: ClientConfig::default().processing_hint,
        }
    }

    /// Create a calculator talking HTTP to the configured service.
    pub fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = HttpArithmeticClient::new(config)?;
        Ok(Self::new(Arc::new(client)).with_processing_hint(config.processing_hint))
    }

    /// Set or disable the interim processing notification.
    pub fn with_processing_hint(mut self, hint: Option<Duration>) -> Self {
        self.processing_hint = hint;
        self
    }

    /// Session identifier used in log records.
    pub fn session_id(&self) -> Uuid {
        self.shared.session_id
    }

    /// Register or clear the listener.
    pub fn set_listener(&self, listener: Option<Listener>) {
        *lock(&self.shared.listener) = listener;
    }

    /// Channel receiving every snapshot published to the listener.
    pub fn subscribe(&self) -> watch::Receiver<CalculatorSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> CalculatorSnapshot {
        self.shared.snapshot()
    }

    /// Error message if set, otherwise the current entry.
    pub fn display(&self) -> String {
        self.snapshot().display_text().to_string()
    }

    /// `"{operand} {operator}"` while an operation is pending and no error is set.
    pub fn expression(&self) -> String {
        self.snapshot().expression()
    }

    /// True while a remote call is in flight.
    pub fn is_processing(&self) -> bool {
        lock(&self.shared.state).processing
    }

    /// Validate and handle a single instruction character.
    pub async fn handle(&self, input: char) -> CalcResult<CalculatorSnapshot> {
        let inst = Instruction::try_from(input)?;
        self.handle_instruction(inst).await
    }

    /// Handle each character of `sequence` in order, waiting for each to finish.
    pub async fn handle_sequence(&self, sequence: &str) -> CalcResult<CalculatorSnapshot> {
        for c in sequence.chars() {
            self.handle(c).await?;
        }
        Ok(self.snapshot())
    }

    /// Handle an already-classified instruction.
    pub async fn handle_instruction(&self, inst: Instruction) -> CalcResult<CalculatorSnapshot> {
        let (before, call) = {
            let mut state = lock(&self.shared.state);
            if state.processing {
                tracing::warn!(session = %self.shared.session_id, instruction = %inst, "Rejected while processing");
                return Err(CalcError::Busy);
            }
            let before = state.snapshot().phase();
            let call = state.apply(inst);
            if call.is_some() {
                state.processing = true;
            }
            (before, call)
        };

        let Some(call) = call else {
            return Ok(self.shared.finish(inst, before));
        };

        let resolution = call.resolution;
        let shared = self.shared.clone();
        let hint = self.processing_hint;
        let task = tokio::spawn(async move {
            let result = shared.execute(&call, hint).await;
            lock(&shared.state).resolve(call.resolution, result);
            shared.finish(inst, before)
        });

        match task.await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::error!(session = %self.shared.session_id, "Remote calculation task failed: {}", e);
                lock(&self.shared.state).resolve(
                    resolution,
                    Err(ClientError::Transport("Calculation aborted".to_string())),
                );
                let snapshot = self.shared.finish(inst, before);
                if e.is_panic() {
                    std::panic::resume_unwind(e.into_panic());
                }
                Ok(snapshot)
            }
        }
    }
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("session_id", &self.shared.session_id)
            .field("state", &self.snapshot())
            .finish()
    }
}

/// Lock ignoring poisoning; the guarded data holds no invariants a panic could break midway.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
