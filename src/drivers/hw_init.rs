//! One-shot peripheral initialisation and the arming-control ADC.
//!
//! Configures ADC1 in one-shot mode for the control channels using raw
//! ESP-IDF sys calls.  Called once from `main()` before the scan loop
//! starts.  GPIO for the cascades and relays is claimed through
//! `esp-idf-hal` pin drivers instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::{error, info};

use crate::app::ports::ControlPort;
use crate::error::Result;

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// scan loop.  `init_control_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

/// Bring up ADC1 and configure every control channel for 12-bit reads.
#[cfg(target_os = "espidf")]
pub fn init_control_adc(channels: &[u8]) -> Result<()> {
    use crate::error::Error;

    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        error!("hw_init: ADC1 unit init failed (rc={ret})");
        return Err(Error::Init("ADC1 unit"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for &channel in channels {
        // SAFETY: handle initialised above; single-threaded init path.
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), u32::from(channel), &chan_cfg) };
        if ret != ESP_OK as i32 {
            error!("hw_init: ADC1 channel {channel} config failed (rc={ret})");
            return Err(Error::Init("ADC1 channel"));
        }
    }

    info!("hw_init: ADC1 configured for {} control channels", channels.len());
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_control_adc(channels: &[u8]) -> Result<()> {
    log::info!("hw_init(sim): ADC init skipped for {} channels", channels.len());
    Ok(())
}

/// Raw one-shot reading; `0` when the read fails.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u8) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded scan-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), u32::from(channel), &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u8) -> u16 {
    0
}

/// [`ControlPort`] backed by ADC1 one-shot reads.
#[derive(Debug, Default)]
pub struct Adc1Controls;

impl ControlPort for Adc1Controls {
    fn sample(&mut self, channel: u8) -> u16 {
        adc1_read(channel)
    }
}
