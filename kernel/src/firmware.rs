//! Board entry: exception vectors, the IRQ trampoline and the main loop.

use core::arch::global_asm;
use core::panic::PanicInfo;

use hmacgate_abi::MARKER_BANK_WORDS;
use hmacgate_boot::{
    self as boot, new_rx_queue, Board, TimerTickIsr, UartRxIsr, BOARD_CONFIG, HMAC_SECRET,
    PAYLOAD,
};
use hmacgate_core::{Session, Transport};
use hmacgate_drivers::{dispatch, SoftCrypto};
use hmacgate_lib::{klog_init, MmioRegion, RegisterFile, TickCounter};

// The vector table and its literal pool are copied to address 0 on reset.
// IRQs arrive in IRQ mode on their own stack; everything else runs in SVC.
global_asm!(
    r#"
    .section .vectors, "ax"
    .arm
    .global _vectors
_vectors:
    ldr pc, .Lreset_addr
    ldr pc, .Lhang_addr
    ldr pc, .Lhang_addr
    ldr pc, .Lhang_addr
    ldr pc, .Lhang_addr
    nop
    ldr pc, .Lirq_addr
    ldr pc, .Lhang_addr
.Lreset_addr: .word _reset
.Lirq_addr:   .word _irq_entry
.Lhang_addr:  .word _hang
_vectors_end:

    .text
    .arm
_reset:
    ldr r0, =_vectors
    mov r1, #0
    ldr r2, =_vectors_end
.Lcopy_vectors:
    ldr r3, [r0], #4
    str r3, [r1], #4
    cmp r0, r2
    blo .Lcopy_vectors

    msr cpsr_c, #0xD2
    ldr sp, =__irq_stack_top
    msr cpsr_c, #0xD3
    ldr sp, =__svc_stack_top

    ldr r0, =__bss_start
    ldr r1, =__bss_end
    mov r2, #0
.Lzero_bss:
    cmp r0, r1
    strlo r2, [r0], #4
    blo .Lzero_bss

    bl firmware_main
_hang:
    b _hang

_irq_entry:
    sub lr, lr, #4
    stmfd sp!, {{r0-r3, r12, lr}}
    bl irq_dispatch_entry
    ldmfd sp!, {{r0-r3, r12, pc}}^
"#
);

static MARKER_RAM: RegisterFile<MARKER_BANK_WORDS> = RegisterFile::new();

static BOARD: Board<MmioRegion, &RegisterFile<MARKER_BANK_WORDS>> =
    Board::versatile(&MARKER_RAM);

static RX_QUEUE: boot::isr::RxQueue = new_rx_queue();
static TICKS: TickCounter = TickCounter::new();

static UART_ISR: UartRxIsr<'static, MmioRegion> =
    UartRxIsr::new(&BOARD.uarts[BOARD_CONFIG.protocol_uart], &RX_QUEUE);
static TIMER_ISR: TimerTickIsr<'static, MmioRegion> = TimerTickIsr::new(
    &BOARD.timers[BOARD_CONFIG.tick_timer][BOARD_CONFIG.tick_counter],
    &TICKS,
);

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    boot::panic_halt(info)
}

#[unsafe(no_mangle)]
extern "C" fn irq_dispatch_entry() {
    dispatch(&BOARD.vic);
}

#[unsafe(no_mangle)]
extern "C" fn firmware_main() -> ! {
    klog_init(BOARD_CONFIG.log_level);

    let mut crypto = SoftCrypto::new(&BOARD.rtc);
    if let Err(err) = boot::bring_up(&BOARD, &BOARD_CONFIG, &UART_ISR, &TIMER_ISR, &crypto) {
        boot::fatal(err);
    }

    boot::print_banner();

    let mut session = match Session::with_timeout(
        HMAC_SECRET.as_bytes(),
        PAYLOAD.as_bytes(),
        BOARD_CONFIG.handshake_timeout_ms,
    ) {
        Ok(session) => session,
        Err(err) => boot::fatal(err),
    };

    let line = match BOARD.protocol_uart(&BOARD_CONFIG) {
        Ok(line) => line,
        Err(err) => boot::fatal(err),
    };
    let mut transport = match Transport::new(&RX_QUEUE, line, &TICKS, BOARD_CONFIG.ms_per_tick())
    {
        Ok(transport) => transport,
        Err(err) => boot::fatal(err),
    };

    boot::serve(&mut session, &mut transport, &mut crypto)
}
