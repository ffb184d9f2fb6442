use defmt::{info, warn, Debug2Format};
use keyberon::key_code::{KbHidReport, KeyCode};
use mahjong_panel::hid::{HidTransmitter, ReportSink};
use rp2040_hal as hal;
use rtic::Mutex;
use usb_device::class::UsbClass as _;
use usb_device::{
    bus::UsbBusAllocator,
    device::{UsbDevice, UsbDeviceBuilder, UsbVidPid},
    UsbError,
};

pub type UsbClass = keyberon::Class<'static, hal::usb::UsbBus, ()>;

// generic USB keyboard
// https://github.com/obdev/v-usb/blob/master/usbdrv/USB-IDs-for-free.txt
const VID: u16 = 0x16c0;
const PID: u16 = 0x27db;

pub struct UsbManager {
    device: UsbDevice<'static, hal::usb::UsbBus>,
    class: UsbClass,
    report: KbHidReport,
    // Last report was refused by a busy endpoint and still has to go out.
    dirty: bool,
}

impl UsbManager {
    pub fn new(usb_bus: &'static UsbBusAllocator<hal::usb::UsbBus>) -> Self {
        let class = keyberon::new_class(usb_bus, ());
        let device = UsbDeviceBuilder::new(usb_bus, UsbVidPid(VID, PID))
            .manufacturer("buffi")
            .product("Mahjong Panel")
            .serial_number(env!("CARGO_PKG_VERSION"))
            .build();
        UsbManager {
            device,
            class,
            report: KbHidReport::default(),
            dirty: false,
        }
    }

    /// Services the USB peripheral. Runs from the USBCTRL interrupt.
    pub fn interrupt(&mut self) {
        if self.device.poll(&mut [&mut self.class]) {
            self.class.poll();
        }
        if self.dirty {
            self.flush();
        }
    }

    fn flush(&mut self) {
        match self.class.write(self.report.as_bytes()) {
            Ok(_len) => self.dirty = false,
            Err(UsbError::WouldBlock) => self.dirty = true,
            Err(e) => {
                // Host not listening (yet). The next change sends a full
                // report anyway.
                warn!("dropped keyboard report: {}", Debug2Format(&e));
                self.dirty = false;
            }
        }
    }
}

impl ReportSink for UsbManager {
    fn send_report(&mut self, report: &KbHidReport) {
        if self.class.device_mut().set_keyboard_report(report.clone()) {
            self.report = report.clone();
            self.flush();
        }
    }
}

/// Reaches the shared [`UsbManager`] from the scan loop through its RTIC
/// lock.
pub struct UsbSink<M>(pub M);

impl<M: Mutex<T = UsbManager>> ReportSink for UsbSink<M> {
    fn send_report(&mut self, report: &KbHidReport) {
        self.0.lock(|usb| usb.send_report(report));
    }
}

/// Prints every transition over RTT before passing it on.
pub struct Logged<H>(pub H);

impl<H: HidTransmitter> HidTransmitter for Logged<H> {
    fn press(&mut self, code: KeyCode) {
        info!("Pressing keycode: {=u8}", code as u8);
        self.0.press(code);
    }

    fn release(&mut self, code: KeyCode) {
        info!("Unpressing keycode: {=u8}", code as u8);
        self.0.release(code);
    }
}
