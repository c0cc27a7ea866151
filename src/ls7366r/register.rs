//! Instruction and register definitions for the LS7366R

/// Instruction opcode (bits 7-6 of the instruction byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Clear register
    Clear = 0x00,
    /// Read register
    Read = 0x40,
    /// Write register
    Write = 0x80,
    /// Load register (CNTR <- DTR, or OTR <- CNTR)
    Load = 0xC0,
}

/// Register selector (bits 5-3 of the instruction byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Mode register 0
    Mdr0 = 0x08,
    /// Mode register 1
    Mdr1 = 0x10,
    /// Data transfer register
    Dtr = 0x18,
    /// Counter
    Cntr = 0x20,
    /// Output transfer register
    Otr = 0x28,
    /// Status register
    Str = 0x30,
}

/// Build an instruction byte
pub(crate) const fn instruction(opcode: Opcode, register: Register) -> u8 {
    opcode as u8 | register as u8
}

/// Quadrature count mode (MDR0 bits 1-0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QuadratureMode {
    /// Clock/direction inputs
    NonQuadrature = 0b00,
    /// One count per quadrature cycle
    X1 = 0b01,
    /// Two counts per quadrature cycle
    X2 = 0b10,
    /// Four counts per quadrature cycle
    #[default]
    X4 = 0b11,
}

/// Count mode (MDR0 bits 3-2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CountMode {
    #[default]
    FreeRunning = 0b00,
    /// Counting stops at carry or borrow
    SingleCycle = 0b01,
    /// Counting is limited to `0..=DTR`
    RangeLimit = 0b10,
    /// Counter wraps at DTR
    ModuloN = 0b11,
}

/// Action on an index pulse (MDR0 bits 5-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IndexMode {
    #[default]
    Disabled = 0b00,
    /// Load DTR into CNTR
    LoadCounter = 0b01,
    /// Reset CNTR
    ResetCounter = 0b10,
    /// Load CNTR into OTR
    LoadOutput = 0b11,
}

/// Filter clock division factor (MDR0 bit 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FilterDivision {
    #[default]
    One = 0,
    Two = 1,
}

/// Mode register 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mdr0 {
    pub quadrature: QuadratureMode,
    pub count_mode: CountMode,
    pub index_mode: IndexMode,
    /// Synchronous index (bit 6); asynchronous when `false`
    pub synchronous_index: bool,
    pub filter_division: FilterDivision,
}

impl Mdr0 {
    #[must_use]
    pub const fn bits(&self) -> u8 {
        (self.quadrature as u8)
            | (self.count_mode as u8) << 2
            | (self.index_mode as u8) << 4
            | (self.synchronous_index as u8) << 6
            | (self.filter_division as u8) << 7
    }
}

impl From<Mdr0> for u8 {
    fn from(mdr0: Mdr0) -> u8 {
        mdr0.bits()
    }
}

/// Counter width (MDR1 bits 1-0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CounterWidth {
    #[default]
    Bits32 = 0b00,
    Bits24 = 0b01,
    Bits16 = 0b10,
    Bits8 = 0b11,
}

impl CounterWidth {
    /// Number of bytes shifted out when reading CNTR/OTR
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            CounterWidth::Bits32 => 4,
            CounterWidth::Bits24 => 3,
            CounterWidth::Bits16 => 2,
            CounterWidth::Bits8 => 1,
        }
    }
}

/// Mode register 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mdr1 {
    pub width: CounterWidth,
    /// Count disable (bit 2)
    pub counting_disabled: bool,
    /// FLAG on IDX (bit 4)
    pub flag_on_index: bool,
    /// FLAG on CMP, CNTR = DTR (bit 5)
    pub flag_on_compare: bool,
    /// FLAG on BW, borrow (bit 6)
    pub flag_on_borrow: bool,
    /// FLAG on CY, carry (bit 7)
    pub flag_on_carry: bool,
}

impl Mdr1 {
    /// Count-disable bit
    pub const COUNT_DISABLE: u8 = 0x04;

    #[must_use]
    pub const fn bits(&self) -> u8 {
        (self.width as u8)
            | (self.counting_disabled as u8) << 2
            | (self.flag_on_index as u8) << 4
            | (self.flag_on_compare as u8) << 5
            | (self.flag_on_borrow as u8) << 6
            | (self.flag_on_carry as u8) << 7
    }
}

impl From<Mdr1> for u8 {
    fn from(mdr1: Mdr1) -> u8 {
        mdr1.bits()
    }
}

bitfield::bitfield! {
    /// STR
    ///
    /// Cleared by a `CLR STR` instruction
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Status(u8);
    impl Debug;
    /// Carry: CNTR overflowed
    pub carry, _: 7;
    /// Borrow: CNTR underflowed
    pub borrow, _: 6;
    /// Compare: CNTR = DTR
    pub compare, _: 5;
    /// Index input latched
    pub index, _: 4;
    /// Counting enabled
    pub count_enabled, _: 3;
    /// Power loss indicator, set on power up
    pub power_loss, _: 2;
    /// Counting direction: `true` = up
    pub count_up, _: 1;
    /// Sign of the count: `true` = negative
    pub sign, _: 0;
}

impl From<u8> for Status {
    fn from(raw: u8) -> Self {
        Status(raw)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status({=u8:#x})", self.0);
    }
}
