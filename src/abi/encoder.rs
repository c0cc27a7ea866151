//! Interrupt-driven ABI quadrature encoder

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::InputPin;
use portable_atomic::{AtomicBool, AtomicI64, AtomicU16, AtomicU32, AtomicUsize, Ordering};

use super::{
    config::{Config, Polarity},
    decoder::{Phase, PhaseTracker, Transition},
    notify::{EdgeHandler, EdgeInterrupt, EdgeSink, Line},
};
use crate::error::Error;

/// Pins and decode state, only touched inside a critical section
struct Lines<A, B> {
    pin_a: A,
    pin_b: B,
    polarity: Polarity,
    tracker: PhaseTracker,
}

impl<A, B, E> Lines<A, B>
where
    A: InputPin<Error = E>,
    B: InputPin<Error = E>,
{
    fn read_a(&mut self) -> Result<bool, E> {
        Ok(self.polarity.apply(self.pin_a.is_high()?))
    }

    fn read_b(&mut self) -> Result<bool, E> {
        Ok(self.polarity.apply(self.pin_b.is_high()?))
    }

    fn read_both(&mut self) -> Result<(bool, bool), Error<E>> {
        let a = self.read_a().map_err(Error::Communication)?;
        let b = self.read_b().map_err(Error::Communication)?;
        Ok((a, b))
    }

    /// Re-sample `line` and decode. A failed read keeps the stored level.
    fn sample(&mut self, line: Line) -> Transition {
        let (a, b) = self.tracker.levels();
        match line {
            Line::A => {
                let level = self.read_a().unwrap_or_else(|_| {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Failed to sample line A");
                    a
                });
                self.tracker.set_a(level)
            }
            Line::B => {
                let level = self.read_b().unwrap_or_else(|_| {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Failed to sample line B");
                    b
                });
                self.tracker.set_b(level)
            }
        }
    }
}

/// Decrements the in-flight counter when a handler returns
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Software quadrature decoder fed by pin-change notifications
///
/// All methods take `&self`, so an encoder can live in a `static` (or a
/// `StaticCell`) and be shared between the edge interrupt handlers and the
/// foreground code. The handlers run the whole transition under one critical
/// section; [`count`](Self::count) is a lock-free atomic load.
pub struct AbiEncoder<A, B> {
    lines: Mutex<RefCell<Lines<A, B>>>,
    count: AtomicI64,
    invalid: AtomicU32,
    steps_per_revolution: AtomicU16,
    enabled: AtomicBool,
    in_flight: AtomicUsize,
}

impl<A, B, E> AbiEncoder<A, B>
where
    A: InputPin<Error = E>,
    B: InputPin<Error = E>,
{
    /// Create an encoder and seed its phase from the current line levels
    ///
    /// The encoder accepts notifications immediately; wire the pins to their
    /// edge interrupts with [`attach`](Self::attach) or call
    /// [`on_a_changed`](Self::on_a_changed) / [`on_b_changed`](Self::on_b_changed)
    /// from existing handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if `config.steps_per_revolution` is zero or a pin
    /// cannot be read
    pub fn new(pin_a: A, pin_b: B, config: Config) -> Result<Self, Error<E>> {
        if config.steps_per_revolution == 0 {
            return Err(Error::ZeroStepsPerRevolution);
        }

        let mut lines = Lines {
            pin_a,
            pin_b,
            polarity: config.polarity,
            tracker: PhaseTracker::new(false, false),
        };
        let (a, b) = lines.read_both()?;
        lines.tracker.reseed(a, b);

        #[cfg(feature = "defmt")]
        defmt::debug!("ABI encoder seeded at phase {}", lines.tracker.phase());

        Ok(Self {
            lines: Mutex::new(RefCell::new(lines)),
            count: AtomicI64::new(0),
            invalid: AtomicU32::new(0),
            steps_per_revolution: AtomicU16::new(config.steps_per_revolution),
            enabled: AtomicBool::new(true),
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Release the input pins, consuming the encoder
    pub fn release(self) -> (A, B) {
        let lines = self.lines.into_inner().into_inner();
        (lines.pin_a, lines.pin_b)
    }

    /// Edge notification for line A (any change)
    pub fn on_a_changed(&self) -> Transition {
        self.on_edge(Line::A)
    }

    /// Edge notification for line B (any change)
    pub fn on_b_changed(&self) -> Transition {
        self.on_edge(Line::B)
    }

    /// Re-sample `line` and apply the resulting transition
    ///
    /// Never panics and never blocks. Returns [`Transition::NoMovement`]
    /// without touching the pins once the encoder is detached.
    pub fn on_edge(&self, line: Line) -> Transition {
        let _guard = InFlight::enter(&self.in_flight);
        if !self.enabled.load(Ordering::SeqCst) {
            return Transition::NoMovement;
        }

        critical_section::with(|cs| {
            let transition = self.lines.borrow_ref_mut(cs).sample(line);
            self.apply(transition);
            transition
        })
    }

    /// Sample both lines and apply the resulting transition
    ///
    /// For polled operation, or to catch up after a suspected missed edge.
    /// Only this path can observe both lines changing at once, which is
    /// counted as an invalid transition.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin cannot be read; the state is left untouched
    pub fn poll(&self) -> Result<Transition, Error<E>> {
        critical_section::with(|cs| -> Result<Transition, Error<E>> {
            let mut lines = self.lines.borrow_ref_mut(cs);
            let (a, b) = lines.read_both()?;
            let transition = lines.tracker.set_levels(a, b);
            self.apply(transition);
            Ok(transition)
        })
    }

    /// Update the counters; called inside the critical section
    fn apply(&self, transition: Transition) {
        match transition {
            Transition::Forward | Transition::Reverse => {
                self.count.fetch_add(transition.step(), Ordering::Relaxed);
            }
            Transition::Invalid => {
                self.invalid.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "defmt")]
                defmt::debug!("Invalid quadrature transition");
            }
            Transition::NoMovement => {}
        }
    }

    /// Accumulated signed step count
    #[must_use]
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Number of transitions rejected because both lines changed at once
    ///
    /// A rising value points at missed edges, glitches or bouncing contacts.
    #[must_use]
    pub fn invalid_transitions(&self) -> u32 {
        self.invalid.load(Ordering::Relaxed)
    }

    /// Phase decoded from the most recent sample
    #[must_use]
    pub fn phase(&self) -> Phase {
        critical_section::with(|cs| self.lines.borrow_ref(cs).tracker.phase())
    }

    #[must_use]
    pub fn steps_per_revolution(&self) -> u16 {
        self.steps_per_revolution.load(Ordering::Relaxed)
    }

    /// Change the scaling used by [`related_turns`](Self::related_turns)
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroStepsPerRevolution`] for zero; the previous value
    /// is kept
    pub fn set_steps_per_revolution(&self, steps: u16) -> Result<(), Error<E>> {
        if steps == 0 {
            return Err(Error::ZeroStepsPerRevolution);
        }
        self.steps_per_revolution.store(steps, Ordering::Relaxed);
        Ok(())
    }

    /// Count expressed in revolutions
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[must_use]
    pub fn related_turns(&self) -> f32 {
        (self.count() as f64 / f64::from(self.steps_per_revolution())) as f32
    }

    /// Zero the count and re-seed the phase from a fresh sample
    ///
    /// Both happen in one critical section so the next edge is decoded
    /// against the current line levels.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin cannot be read; the state is left untouched
    pub fn reset(&self) -> Result<(), Error<E>> {
        critical_section::with(|cs| -> Result<(), Error<E>> {
            let mut lines = self.lines.borrow_ref_mut(cs);
            let (a, b) = lines.read_both()?;
            lines.tracker.reseed(a, b);
            self.count.store(0, Ordering::Relaxed);
            self.invalid.store(0, Ordering::Relaxed);
            Ok(())
        })
    }

    /// Re-seed the phase and start listening for edges on both lines
    ///
    /// The count is kept; movement while detached is not recovered.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin cannot be read; no source is armed then
    pub fn attach<IA, IB>(&self, irq_a: &mut IA, irq_b: &mut IB) -> Result<(), Error<E>>
    where
        IA: EdgeInterrupt,
        IB: EdgeInterrupt,
    {
        critical_section::with(|cs| -> Result<(), Error<E>> {
            let mut lines = self.lines.borrow_ref_mut(cs);
            let (a, b) = lines.read_both()?;
            lines.tracker.reseed(a, b);
            Ok(())
        })?;

        self.enabled.store(true, Ordering::SeqCst);
        irq_a.listen_any_edge();
        irq_b.listen_any_edge();
        Ok(())
    }

    /// Stop listening and wait until no notification is being handled
    ///
    /// Must not be called from an interrupt that can preempt the edge
    /// handlers, or the wait never finishes.
    pub fn detach<IA, IB>(&self, irq_a: &mut IA, irq_b: &mut IB)
    where
        IA: EdgeInterrupt,
        IB: EdgeInterrupt,
    {
        irq_a.unlisten();
        irq_b.unlisten();
        self.enabled.store(false, Ordering::SeqCst);

        while self.in_flight.load(Ordering::SeqCst) != 0 {
            core::hint::spin_loop();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("ABI encoder detached at count {}", self.count());
    }

    /// Whether notifications are currently being decoded
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl<A, B, E> AbiEncoder<A, B>
where
    A: InputPin<Error = E> + Send,
    B: InputPin<Error = E> + Send,
{
    /// Bind a notification for `line` to this encoder
    #[must_use]
    pub fn handler(&self, line: Line) -> EdgeHandler<'_> {
        EdgeHandler::new(self, line)
    }
}

impl<A, B, E> EdgeSink for AbiEncoder<A, B>
where
    A: InputPin<Error = E> + Send,
    B: InputPin<Error = E> + Send,
{
    fn on_edge(&self, line: Line) {
        match line {
            Line::A => self.on_a_changed(),
            Line::B => self.on_b_changed(),
        };
    }
}
