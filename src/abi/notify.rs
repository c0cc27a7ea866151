//! Edge-notification plumbing between the platform interrupt layer and an encoder

/// One of the two quadrature input lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    A,
    B,
}

/// Platform edge-interrupt source for a single input line
///
/// Implemented by the HAL glue for whatever peripheral routes pin changes to
/// an interrupt (EXTI line, GPIOTE channel, pin-change interrupt...).
pub trait EdgeInterrupt {
    /// Start notifying on both rising and falling edges
    fn listen_any_edge(&mut self);

    /// Stop notifying; pending notifications are discarded
    fn unlisten(&mut self);
}

/// Receiver of edge notifications
pub trait EdgeSink: Sync {
    /// A level change may have happened on `line`
    fn on_edge(&self, line: Line);
}

/// An edge notification bound to the instance that handles it
///
/// Interrupt handlers keep a table of these, one per interrupt line, so any
/// number of encoders can be routed without a global instance slot:
///
/// ```ignore
/// static ROUTES: Mutex<RefCell<[Option<EdgeHandler<'static>>; 16]>> = ...;
///
/// #[interrupt]
/// fn EXTI0_1() {
///     critical_section::with(|cs| {
///         if let Some(handler) = ROUTES.borrow_ref(cs)[0] {
///             handler.fire();
///         }
///     });
/// }
/// ```
#[derive(Clone, Copy)]
pub struct EdgeHandler<'a> {
    sink: &'a dyn EdgeSink,
    line: Line,
}

impl<'a> EdgeHandler<'a> {
    #[must_use]
    pub fn new(sink: &'a dyn EdgeSink, line: Line) -> Self {
        Self { sink, line }
    }

    /// The line this handler is bound to
    #[must_use]
    pub fn line(&self) -> Line {
        self.line
    }

    /// Deliver the notification to the bound instance
    pub fn fire(&self) {
        self.sink.on_edge(self.line);
    }
}

impl core::fmt::Debug for EdgeHandler<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EdgeHandler").field("line", &self.line).finish_non_exhaustive()
    }
}
