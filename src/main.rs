#![no_std]
#![no_main]

mod board;
mod usb_manager;

#[rtic::app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use rp2040_hal::{
        clocks,
        sio::Sio,
        usb::UsbBus,
        watchdog::Watchdog,
        Clock,
    };
    use rp_pico::XOSC_CRYSTAL_FREQ;

    use core::mem::MaybeUninit;
    use cortex_m::delay::Delay;
    use defmt::info;
    use rtic::Mutex;
    use usb_device::bus::UsbBusAllocator;

    use defmt_rtt as _;
    use panic_probe as _;

    use mahjong_panel::hid::HidKeyboard;
    use mahjong_panel::keymap::{COLS, KEYMAP, ROWS, UNUSED};
    use mahjong_panel::scanner::{Scanner, Shutdown};

    use crate::board::{self, PanelScanner};
    use crate::usb_manager::{Logged, UsbManager, UsbSink};

    #[shared]
    struct Shared {
        usb: UsbManager,
    }

    #[local]
    struct Local {
        scanner: PanelScanner,
        delay: Delay,
    }

    #[init(local = [
        // The USB class and device borrow the allocator for 'static.
        usb_bus: MaybeUninit<UsbBusAllocator<UsbBus>> = MaybeUninit::uninit()
    ])]
    fn init(mut ctx: init::Context) -> (Shared, Local) {
        info!("Mahjong panel starting");

        // The default is to generate a 125 MHz system clock
        let mut watchdog = Watchdog::new(ctx.device.WATCHDOG);
        let clocks = clocks::init_clocks_and_plls(
            XOSC_CRYSTAL_FREQ,
            ctx.device.XOSC,
            ctx.device.CLOCKS,
            ctx.device.PLL_SYS,
            ctx.device.PLL_USB,
            &mut ctx.device.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let sio = Sio::new(ctx.device.SIO);
        let pins = rp_pico::Pins::new(
            ctx.device.IO_BANK0,
            ctx.device.PADS_BANK0,
            sio.gpio_bank0,
            &mut ctx.device.RESETS,
        );
        let scanner = Scanner::new(board::init_matrix(pins), &KEYMAP);

        let usb_bus: &'static _ = ctx.local.usb_bus.write(UsbBusAllocator::new(UsbBus::new(
            ctx.device.USBCTRL_REGS,
            ctx.device.USBCTRL_DPRAM,
            clocks.usb_clock,
            true,
            &mut ctx.device.RESETS,
        )));
        let usb = UsbManager::new(usb_bus);

        let delay = Delay::new(ctx.core.SYST, clocks.system_clock.freq().to_Hz());

        info!("Scanning {=usize} x {=usize} matrix", ROWS, COLS);
        info!(
            "{=usize} unwired positions send keycode {=u8}",
            KEYMAP.positions_of(UNUSED),
            UNUSED as u8
        );
        (Shared { usb }, Local { scanner, delay })
    }

    #[task(binds = USBCTRL_IRQ, priority = 1, shared = [usb])]
    fn usb_irq(mut ctx: usb_irq::Context) {
        ctx.shared.usb.lock(|usb| usb.interrupt());
    }

    #[idle(local = [scanner, delay], shared = [usb])]
    fn idle(ctx: idle::Context) -> ! {
        let mut hid = Logged(HidKeyboard::new(UsbSink(ctx.shared.usb)));
        // Never requested: the panel scans until power is removed.
        let shutdown = Shutdown::new();

        match ctx.local.scanner.run(&mut hid, ctx.local.delay, &shutdown) {
            Ok(()) => {}
            Err(e) => match e {},
        }

        loop {
            cortex_m::asm::wfi();
        }
    }
}
