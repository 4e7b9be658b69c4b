//! USB transport: find the console by vendor/product id and expose its
//! bulk endpoints as the session's duplex byte channel.

use std::io;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rusb::{Device, DeviceHandle, Direction, GlobalContext, TransferType};
use tinpush_core::Transport;
use tracing::{debug, info};

// Zero means no timeout in libusb; the protocol imposes none.
const NO_TIMEOUT: Duration = Duration::from_secs(0);

/// Open bulk in/out endpoints on the matched device.
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
    ep_in: u8,
    ep_out: u8,
}

/// Find the first device matching the given ids, claim interface 0, and
/// resolve its bulk endpoint pair. Zero matches is fatal.
pub fn open(vendor_id: u16, product_id: u16) -> Result<UsbTransport> {
    let devices = rusb::devices().context("listing usb devices")?;
    let device = devices.iter().find(|d| {
        d.device_descriptor()
            .map(|desc| desc.vendor_id() == vendor_id && desc.product_id() == product_id)
            .unwrap_or(false)
    });
    let Some(device) = device else {
        bail!("no usb device matching {vendor_id:04x}:{product_id:04x}; is the installer in usb mode?");
    };
    let (ep_in, ep_out) = bulk_endpoints(&device)?;

    let mut handle = device.open().context("opening usb device")?;
    match handle.set_auto_detach_kernel_driver(true) {
        Ok(()) | Err(rusb::Error::NotSupported) => {}
        Err(e) => return Err(e).context("detaching kernel driver"),
    }
    handle.claim_interface(0).context("claiming interface 0")?;
    info!(
        device = %format!("{vendor_id:04x}:{product_id:04x}"),
        ep_in, ep_out, "usb device ready"
    );
    Ok(UsbTransport {
        handle,
        ep_in,
        ep_out,
    })
}

/// Bulk in/out endpoint addresses on interface 0.
fn bulk_endpoints(device: &Device<GlobalContext>) -> Result<(u8, u8)> {
    let config = device
        .active_config_descriptor()
        .context("reading active config descriptor")?;
    let mut ep_in = None;
    let mut ep_out = None;
    for interface in config.interfaces().filter(|i| i.number() == 0) {
        for descriptor in interface.descriptors() {
            for endpoint in descriptor.endpoint_descriptors() {
                if endpoint.transfer_type() != TransferType::Bulk {
                    continue;
                }
                match endpoint.direction() {
                    Direction::In => ep_in = Some(endpoint.address()),
                    Direction::Out => ep_out = Some(endpoint.address()),
                }
            }
        }
    }
    match (ep_in, ep_out) {
        (Some(ep_in), Some(ep_out)) => Ok((ep_in, ep_out)),
        _ => bail!("bulk endpoint pair not found on interface 0"),
    }
}

impl Transport for UsbTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self
            .handle
            .read_bulk(self.ep_in, buf, NO_TIMEOUT)
            .map_err(usb_io_error)?;
        debug!(n, "bulk read");
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handle
            .write_bulk(self.ep_out, buf, NO_TIMEOUT)
            .map_err(usb_io_error)
    }
}

fn usb_io_error(e: rusb::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
