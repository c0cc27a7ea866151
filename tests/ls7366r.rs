//! LS7366R tests using mocked SPI.

use embedded_hal_mock::eh1::{
    delay::NoopDelay,
    spi::{Mock as SpiMock, Transaction as SpiTransaction},
};
use quadrature_drivers::ls7366r::{
    Config, CountMode, CounterWidth, IndexMode, Ls7366r, Mdr0, Mdr1, QuadratureMode,
};

const CLR_CNTR: u8 = 0x20;
const CLR_STR: u8 = 0x30;
const RD_STR: u8 = 0x70;
const RD_OTR: u8 = 0x68;
const WR_MDR0: u8 = 0x88;
const WR_MDR1: u8 = 0x90;
const LOAD_OTR: u8 = 0xE8;

/// One chip-select frame writing `bytes`.
fn write_frame(bytes: &[u8]) -> Vec<SpiTransaction<u8>> {
    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(bytes.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

/// One chip-select frame sending `command` and reading `response`.
fn read_frame(command: u8, response: &[u8]) -> Vec<SpiTransaction<u8>> {
    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![command]),
        SpiTransaction::read_vec(response.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

/// LOAD OTR followed by the OTR read.
fn sync_frames(response: &[u8]) -> Vec<SpiTransaction<u8>> {
    let mut frames = write_frame(&[LOAD_OTR]);
    frames.extend(read_frame(RD_OTR, response));
    frames
}

fn counter(expectations: &[SpiTransaction<u8>], config: Config) -> Ls7366r<SpiMock<u8>, NoopDelay> {
    Ls7366r::new(SpiMock::new(expectations), NoopDelay::new(), config)
}

#[tokio::test]
async fn init_writes_default_modes_and_clears_counter() {
    let mut expectations = write_frame(&[WR_MDR0, 0x03]);
    expectations.extend(write_frame(&[WR_MDR1, 0x00]));
    expectations.extend(write_frame(&[CLR_CNTR]));

    let mut chip = counter(&expectations, Config::default());
    chip.init().await.unwrap();

    assert_eq!(chip.count(), 0);
    assert!(chip.is_enabled());

    let (mut spi, _) = chip.release();
    spi.done();
}

#[tokio::test]
async fn init_writes_custom_modes() {
    let mdr0 = Mdr0 {
        quadrature: QuadratureMode::X1,
        count_mode: CountMode::RangeLimit,
        index_mode: IndexMode::ResetCounter,
        ..Mdr0::default()
    };
    let mdr1 = Mdr1 {
        flag_on_index: true,
        ..Mdr1::default()
    };

    let mut expectations = write_frame(&[WR_MDR0, 0x01 | 0x08 | 0x20]);
    expectations.extend(write_frame(&[WR_MDR1, 0x10]));
    expectations.extend(write_frame(&[CLR_CNTR]));

    let mut chip = counter(&expectations, Config::default().mdr0(mdr0).mdr1(mdr1));
    chip.init().await.unwrap();

    assert_eq!(chip.config().mdr0, mdr0);

    let (mut spi, _) = chip.release();
    spi.done();
}

#[tokio::test]
async fn sync_reads_signed_count_msb_first() {
    let mut expectations = sync_frames(&[0x00, 0x01, 0x86, 0xA0]);
    expectations.extend(sync_frames(&[0xFF, 0xFF, 0xFF, 0x9C]));

    let mut chip = counter(&expectations, Config::default());

    assert_eq!(chip.sync().await.unwrap(), 100_000);
    assert_eq!(chip.count(), 100_000);
    assert_eq!(chip.sync().await.unwrap(), -100);
    assert_eq!(chip.count(), -100);

    let (mut spi, _) = chip.release();
    spi.done();
}

#[tokio::test]
async fn sync_reads_only_configured_width() {
    let config = Config::default().mdr1(Mdr1 {
        width: CounterWidth::Bits16,
        ..Mdr1::default()
    });
    let expectations = sync_frames(&[0xFF, 0xFE]);

    let mut chip = counter(&expectations, config);
    assert_eq!(chip.sync().await.unwrap(), -2);

    let (mut spi, _) = chip.release();
    spi.done();
}

#[tokio::test]
async fn reset_clears_cached_count() {
    let mut expectations = sync_frames(&[0x00, 0x00, 0x00, 0x2A]);
    expectations.extend(write_frame(&[CLR_CNTR]));

    let mut chip = counter(&expectations, Config::default());
    chip.sync().await.unwrap();
    assert_eq!(chip.count(), 42);

    chip.reset().await.unwrap();
    assert_eq!(chip.count(), 0);

    let (mut spi, _) = chip.release();
    spi.done();
}

#[tokio::test]
async fn reads_and_clears_status() {
    // CEN, U/D and S set
    let mut expectations = read_frame(RD_STR, &[0b0000_1011]);
    expectations.extend(write_frame(&[CLR_STR]));

    let mut chip = counter(&expectations, Config::default());

    let status = chip.read_status().await.unwrap();
    assert!(status.count_enabled());
    assert!(status.count_up());
    assert!(status.sign());
    assert!(!status.carry());
    assert!(!status.power_loss());

    chip.clear_status().await.unwrap();

    let (mut spi, _) = chip.release();
    spi.done();
}

#[tokio::test]
async fn disable_and_enable_rewrite_mdr1() {
    let config = Config::default().mdr1(Mdr1 {
        width: CounterWidth::Bits24,
        flag_on_carry: true,
        ..Mdr1::default()
    });
    let mut expectations = write_frame(&[WR_MDR1, 0x01 | 0x04 | 0x80]);
    expectations.extend(write_frame(&[WR_MDR1, 0x01 | 0x80]));

    let mut chip = counter(&expectations, config);

    chip.disable().await.unwrap();
    assert!(!chip.is_enabled());
    chip.enable().await.unwrap();
    assert!(chip.is_enabled());

    let (mut spi, _) = chip.release();
    spi.done();
}
