// Instruction decode and execution
//
// `decode` maps an opcode byte to its mnemonic, addressing mode, and base
// cycle count; `execute_instruction` runs one instruction to completion and
// returns how many cycles it consumed, including the page-cross and branch
// penalties. Unofficial opcodes execute as two-cycle no-ops.

use super::addressing::{AddrMode, Operand};
use super::{flags, vectors, Cpu};
use crate::bus::Bus;

/// Instruction mnemonics (official set)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Mnemonic {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC,
    CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP,
    JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP, ROL, ROR, RTI,
    RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,
    /// Unofficial opcode; runs as a no-op
    XXX,
}

/// Decoded instruction properties
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
    /// Base cycle count before penalties
    pub cycles: u8,
    /// Whether a page cross during indexing costs one extra cycle
    pub page_penalty: bool,
}

const fn op(mnemonic: Mnemonic, mode: AddrMode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        mode,
        cycles,
        page_penalty: false,
    }
}

const fn opp(mnemonic: Mnemonic, mode: AddrMode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        mode,
        cycles,
        page_penalty: true,
    }
}

/// Decode one opcode byte
#[rustfmt::skip]
pub fn decode(opcode: u8) -> Instruction {
    use AddrMode::*;
    use Mnemonic::*;

    match opcode {
        0x69 => op(ADC, Immediate, 2),  0x65 => op(ADC, ZeroPage, 3),
        0x75 => op(ADC, ZeroPageX, 4),  0x6D => op(ADC, Absolute, 4),
        0x7D => opp(ADC, AbsoluteX, 4), 0x79 => opp(ADC, AbsoluteY, 4),
        0x61 => op(ADC, IndirectX, 6),  0x71 => opp(ADC, IndirectY, 5),

        0x29 => op(AND, Immediate, 2),  0x25 => op(AND, ZeroPage, 3),
        0x35 => op(AND, ZeroPageX, 4),  0x2D => op(AND, Absolute, 4),
        0x3D => opp(AND, AbsoluteX, 4), 0x39 => opp(AND, AbsoluteY, 4),
        0x21 => op(AND, IndirectX, 6),  0x31 => opp(AND, IndirectY, 5),

        0x0A => op(ASL, Accumulator, 2), 0x06 => op(ASL, ZeroPage, 5),
        0x16 => op(ASL, ZeroPageX, 6),   0x0E => op(ASL, Absolute, 6),
        0x1E => op(ASL, AbsoluteX, 7),

        0x90 => op(BCC, Relative, 2), 0xB0 => op(BCS, Relative, 2),
        0xF0 => op(BEQ, Relative, 2), 0x30 => op(BMI, Relative, 2),
        0xD0 => op(BNE, Relative, 2), 0x10 => op(BPL, Relative, 2),
        0x50 => op(BVC, Relative, 2), 0x70 => op(BVS, Relative, 2),

        0x24 => op(BIT, ZeroPage, 3), 0x2C => op(BIT, Absolute, 4),

        0x00 => op(BRK, Implied, 7),

        0x18 => op(CLC, Implied, 2), 0xD8 => op(CLD, Implied, 2),
        0x58 => op(CLI, Implied, 2), 0xB8 => op(CLV, Implied, 2),

        0xC9 => op(CMP, Immediate, 2),  0xC5 => op(CMP, ZeroPage, 3),
        0xD5 => op(CMP, ZeroPageX, 4),  0xCD => op(CMP, Absolute, 4),
        0xDD => opp(CMP, AbsoluteX, 4), 0xD9 => opp(CMP, AbsoluteY, 4),
        0xC1 => op(CMP, IndirectX, 6),  0xD1 => opp(CMP, IndirectY, 5),

        0xE0 => op(CPX, Immediate, 2), 0xE4 => op(CPX, ZeroPage, 3),
        0xEC => op(CPX, Absolute, 4),
        0xC0 => op(CPY, Immediate, 2), 0xC4 => op(CPY, ZeroPage, 3),
        0xCC => op(CPY, Absolute, 4),

        0xC6 => op(DEC, ZeroPage, 5), 0xD6 => op(DEC, ZeroPageX, 6),
        0xCE => op(DEC, Absolute, 6), 0xDE => op(DEC, AbsoluteX, 7),
        0xCA => op(DEX, Implied, 2),  0x88 => op(DEY, Implied, 2),

        0x49 => op(EOR, Immediate, 2),  0x45 => op(EOR, ZeroPage, 3),
        0x55 => op(EOR, ZeroPageX, 4),  0x4D => op(EOR, Absolute, 4),
        0x5D => opp(EOR, AbsoluteX, 4), 0x59 => opp(EOR, AbsoluteY, 4),
        0x41 => op(EOR, IndirectX, 6),  0x51 => opp(EOR, IndirectY, 5),

        0xE6 => op(INC, ZeroPage, 5), 0xF6 => op(INC, ZeroPageX, 6),
        0xEE => op(INC, Absolute, 6), 0xFE => op(INC, AbsoluteX, 7),
        0xE8 => op(INX, Implied, 2),  0xC8 => op(INY, Implied, 2),

        0x4C => op(JMP, Absolute, 3), 0x6C => op(JMP, Indirect, 5),
        0x20 => op(JSR, Absolute, 6),

        0xA9 => op(LDA, Immediate, 2),  0xA5 => op(LDA, ZeroPage, 3),
        0xB5 => op(LDA, ZeroPageX, 4),  0xAD => op(LDA, Absolute, 4),
        0xBD => opp(LDA, AbsoluteX, 4), 0xB9 => opp(LDA, AbsoluteY, 4),
        0xA1 => op(LDA, IndirectX, 6),  0xB1 => opp(LDA, IndirectY, 5),

        0xA2 => op(LDX, Immediate, 2), 0xA6 => op(LDX, ZeroPage, 3),
        0xB6 => op(LDX, ZeroPageY, 4), 0xAE => op(LDX, Absolute, 4),
        0xBE => opp(LDX, AbsoluteY, 4),

        0xA0 => op(LDY, Immediate, 2), 0xA4 => op(LDY, ZeroPage, 3),
        0xB4 => op(LDY, ZeroPageX, 4), 0xAC => op(LDY, Absolute, 4),
        0xBC => opp(LDY, AbsoluteX, 4),

        0x4A => op(LSR, Accumulator, 2), 0x46 => op(LSR, ZeroPage, 5),
        0x56 => op(LSR, ZeroPageX, 6),   0x4E => op(LSR, Absolute, 6),
        0x5E => op(LSR, AbsoluteX, 7),

        0xEA => op(NOP, Implied, 2),

        0x09 => op(ORA, Immediate, 2),  0x05 => op(ORA, ZeroPage, 3),
        0x15 => op(ORA, ZeroPageX, 4),  0x0D => op(ORA, Absolute, 4),
        0x1D => opp(ORA, AbsoluteX, 4), 0x19 => opp(ORA, AbsoluteY, 4),
        0x01 => op(ORA, IndirectX, 6),  0x11 => opp(ORA, IndirectY, 5),

        0x48 => op(PHA, Implied, 3), 0x08 => op(PHP, Implied, 3),
        0x68 => op(PLA, Implied, 4), 0x28 => op(PLP, Implied, 4),

        0x2A => op(ROL, Accumulator, 2), 0x26 => op(ROL, ZeroPage, 5),
        0x36 => op(ROL, ZeroPageX, 6),   0x2E => op(ROL, Absolute, 6),
        0x3E => op(ROL, AbsoluteX, 7),

        0x6A => op(ROR, Accumulator, 2), 0x66 => op(ROR, ZeroPage, 5),
        0x76 => op(ROR, ZeroPageX, 6),   0x6E => op(ROR, Absolute, 6),
        0x7E => op(ROR, AbsoluteX, 7),

        0x40 => op(RTI, Implied, 6), 0x60 => op(RTS, Implied, 6),

        0xE9 => op(SBC, Immediate, 2),  0xE5 => op(SBC, ZeroPage, 3),
        0xF5 => op(SBC, ZeroPageX, 4),  0xED => op(SBC, Absolute, 4),
        0xFD => opp(SBC, AbsoluteX, 4), 0xF9 => opp(SBC, AbsoluteY, 4),
        0xE1 => op(SBC, IndirectX, 6),  0xF1 => opp(SBC, IndirectY, 5),

        0x38 => op(SEC, Implied, 2), 0xF8 => op(SED, Implied, 2),
        0x78 => op(SEI, Implied, 2),

        0x85 => op(STA, ZeroPage, 3),  0x95 => op(STA, ZeroPageX, 4),
        0x8D => op(STA, Absolute, 4),  0x9D => op(STA, AbsoluteX, 5),
        0x99 => op(STA, AbsoluteY, 5), 0x81 => op(STA, IndirectX, 6),
        0x91 => op(STA, IndirectY, 6),

        0x86 => op(STX, ZeroPage, 3), 0x96 => op(STX, ZeroPageY, 4),
        0x8E => op(STX, Absolute, 4),
        0x84 => op(STY, ZeroPage, 3), 0x94 => op(STY, ZeroPageX, 4),
        0x8C => op(STY, Absolute, 4),

        0xAA => op(TAX, Implied, 2), 0xA8 => op(TAY, Implied, 2),
        0xBA => op(TSX, Implied, 2), 0x8A => op(TXA, Implied, 2),
        0x9A => op(TXS, Implied, 2), 0x98 => op(TYA, Implied, 2),

        _ => op(XXX, Implied, 2),
    }
}

impl Cpu {
    /// Read the operand value for a resolved operand
    #[inline]
    fn read_value(&mut self, bus: &mut Bus, mode: AddrMode, operand: Operand) -> u8 {
        if mode == AddrMode::Accumulator {
            self.a
        } else {
            bus.cpu_read(operand.addr)
        }
    }

    /// Write back a read-modify-write result
    #[inline]
    fn write_value(&mut self, bus: &mut Bus, mode: AddrMode, operand: Operand, value: u8) {
        if mode == AddrMode::Accumulator {
            self.a = value;
        } else {
            bus.cpu_write(operand.addr, value);
        }
    }

    /// Add with carry, shared by ADC and SBC (SBC adds the complement)
    fn add_with_carry(&mut self, value: u8) {
        let carry = self.get_flag(flags::CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;

        self.update_flag(flags::CARRY, sum > 0xFF);
        self.update_flag(
            flags::OVERFLOW,
            (!(self.a ^ value) & (self.a ^ result) & 0x80) != 0,
        );
        self.a = result;
        self.update_zn(result);
    }

    /// Compare a register against memory
    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.update_flag(flags::CARRY, register >= value);
        self.update_zn(result);
    }

    /// Take or skip a branch; returns the extra cycles spent
    fn branch(&mut self, taken: bool, target: u16) -> u8 {
        if !taken {
            return 0;
        }
        let extra = if self.pc & 0xFF00 != target & 0xFF00 {
            2
        } else {
            1
        };
        self.pc = target;
        extra
    }

    /// Execute the instruction at PC and return its cycle cost
    pub(crate) fn execute_instruction(&mut self, bus: &mut Bus) -> u8 {
        use Mnemonic::*;

        let opcode = self.fetch(bus);
        let instr = decode(opcode);
        let operand = self.fetch_operand(bus, instr.mode);

        let mut cycles = instr.cycles;

        match instr.mnemonic {
            // Loads and stores
            LDA => {
                self.a = self.read_value(bus, instr.mode, operand);
                self.update_zn(self.a);
            }
            LDX => {
                self.x = self.read_value(bus, instr.mode, operand);
                self.update_zn(self.x);
            }
            LDY => {
                self.y = self.read_value(bus, instr.mode, operand);
                self.update_zn(self.y);
            }
            STA => bus.cpu_write(operand.addr, self.a),
            STX => bus.cpu_write(operand.addr, self.x),
            STY => bus.cpu_write(operand.addr, self.y),

            // Register transfers
            TAX => {
                self.x = self.a;
                self.update_zn(self.x);
            }
            TAY => {
                self.y = self.a;
                self.update_zn(self.y);
            }
            TXA => {
                self.a = self.x;
                self.update_zn(self.a);
            }
            TYA => {
                self.a = self.y;
                self.update_zn(self.a);
            }
            TSX => {
                self.x = self.sp;
                self.update_zn(self.x);
            }
            TXS => self.sp = self.x,

            // Stack
            PHA => self.push(bus, self.a),
            PHP => {
                let pushed = self.status | flags::BREAK | flags::UNUSED;
                self.push(bus, pushed);
            }
            PLA => {
                self.a = self.pop(bus);
                self.update_zn(self.a);
            }
            PLP => {
                self.status = (self.pop(bus) | flags::UNUSED) & !flags::BREAK;
            }

            // Arithmetic
            ADC => {
                let value = self.read_value(bus, instr.mode, operand);
                self.add_with_carry(value);
            }
            SBC => {
                let value = self.read_value(bus, instr.mode, operand);
                self.add_with_carry(!value);
            }
            CMP => {
                let value = self.read_value(bus, instr.mode, operand);
                self.compare(self.a, value);
            }
            CPX => {
                let value = self.read_value(bus, instr.mode, operand);
                self.compare(self.x, value);
            }
            CPY => {
                let value = self.read_value(bus, instr.mode, operand);
                self.compare(self.y, value);
            }

            // Increments and decrements
            INC => {
                let value = self.read_value(bus, instr.mode, operand).wrapping_add(1);
                self.write_value(bus, instr.mode, operand, value);
                self.update_zn(value);
            }
            DEC => {
                let value = self.read_value(bus, instr.mode, operand).wrapping_sub(1);
                self.write_value(bus, instr.mode, operand, value);
                self.update_zn(value);
            }
            INX => {
                self.x = self.x.wrapping_add(1);
                self.update_zn(self.x);
            }
            DEX => {
                self.x = self.x.wrapping_sub(1);
                self.update_zn(self.x);
            }
            INY => {
                self.y = self.y.wrapping_add(1);
                self.update_zn(self.y);
            }
            DEY => {
                self.y = self.y.wrapping_sub(1);
                self.update_zn(self.y);
            }

            // Bitwise
            AND => {
                self.a &= self.read_value(bus, instr.mode, operand);
                self.update_zn(self.a);
            }
            ORA => {
                self.a |= self.read_value(bus, instr.mode, operand);
                self.update_zn(self.a);
            }
            EOR => {
                self.a ^= self.read_value(bus, instr.mode, operand);
                self.update_zn(self.a);
            }
            BIT => {
                let value = self.read_value(bus, instr.mode, operand);
                self.update_flag(flags::ZERO, self.a & value == 0);
                self.update_flag(flags::NEGATIVE, value & 0x80 != 0);
                self.update_flag(flags::OVERFLOW, value & 0x40 != 0);
            }

            // Shifts and rotates
            ASL => {
                let value = self.read_value(bus, instr.mode, operand);
                let result = value << 1;
                self.update_flag(flags::CARRY, value & 0x80 != 0);
                self.write_value(bus, instr.mode, operand, result);
                self.update_zn(result);
            }
            LSR => {
                let value = self.read_value(bus, instr.mode, operand);
                let result = value >> 1;
                self.update_flag(flags::CARRY, value & 0x01 != 0);
                self.write_value(bus, instr.mode, operand, result);
                self.update_zn(result);
            }
            ROL => {
                let value = self.read_value(bus, instr.mode, operand);
                let result = (value << 1) | self.get_flag(flags::CARRY) as u8;
                self.update_flag(flags::CARRY, value & 0x80 != 0);
                self.write_value(bus, instr.mode, operand, result);
                self.update_zn(result);
            }
            ROR => {
                let value = self.read_value(bus, instr.mode, operand);
                let result = (value >> 1) | ((self.get_flag(flags::CARRY) as u8) << 7);
                self.update_flag(flags::CARRY, value & 0x01 != 0);
                self.write_value(bus, instr.mode, operand, result);
                self.update_zn(result);
            }

            // Jumps and subroutines
            JMP => self.pc = operand.addr,
            JSR => {
                self.push_u16(bus, self.pc.wrapping_sub(1));
                self.pc = operand.addr;
            }
            RTS => {
                self.pc = self.pop_u16(bus).wrapping_add(1);
            }
            RTI => {
                self.status = (self.pop(bus) | flags::UNUSED) & !flags::BREAK;
                self.pc = self.pop_u16(bus);
            }
            BRK => {
                // BRK is a two-byte instruction; the padding byte is skipped
                self.pc = self.pc.wrapping_add(1);
                self.push_u16(bus, self.pc);
                let pushed = self.status | flags::BREAK | flags::UNUSED;
                self.push(bus, pushed);
                self.set_flag(flags::INTERRUPT_DISABLE);

                let lo = bus.cpu_read(vectors::IRQ) as u16;
                let hi = bus.cpu_read(vectors::IRQ.wrapping_add(1)) as u16;
                self.pc = (hi << 8) | lo;
            }

            // Branches
            BCC => cycles += self.branch(!self.get_flag(flags::CARRY), operand.addr),
            BCS => cycles += self.branch(self.get_flag(flags::CARRY), operand.addr),
            BNE => cycles += self.branch(!self.get_flag(flags::ZERO), operand.addr),
            BEQ => cycles += self.branch(self.get_flag(flags::ZERO), operand.addr),
            BPL => cycles += self.branch(!self.get_flag(flags::NEGATIVE), operand.addr),
            BMI => cycles += self.branch(self.get_flag(flags::NEGATIVE), operand.addr),
            BVC => cycles += self.branch(!self.get_flag(flags::OVERFLOW), operand.addr),
            BVS => cycles += self.branch(self.get_flag(flags::OVERFLOW), operand.addr),

            // Flag operations
            CLC => self.clear_flag(flags::CARRY),
            SEC => self.set_flag(flags::CARRY),
            CLI => self.clear_flag(flags::INTERRUPT_DISABLE),
            SEI => self.set_flag(flags::INTERRUPT_DISABLE),
            CLV => self.clear_flag(flags::OVERFLOW),
            CLD => self.clear_flag(flags::DECIMAL),
            SED => self.set_flag(flags::DECIMAL),

            NOP => {}
            XXX => {
                log::warn!("unofficial opcode ${:02X} executed as NOP", opcode);
            }
        }

        if instr.page_penalty && operand.page_crossed {
            cycles += 1;
        }

        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Load a program at $0200 and point PC at it
    fn setup(program: &[u8]) -> (Cpu, Bus) {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        for (i, &byte) in program.iter().enumerate() {
            bus.cpu_write(0x0200 + i as u16, byte);
        }
        cpu.pc = 0x0200;
        (cpu, bus)
    }

    #[test]
    fn test_lda_immediate_sets_flags() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xA9, 0x80]);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.get_flag(flags::ZERO));

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.get_flag(flags::NEGATIVE));
        assert!(!cpu.get_flag(flags::ZERO));
    }

    #[test]
    fn test_sta_and_round_trip() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x42, 0x85, 0x10]);
        cpu.step(&mut bus); // LDA #$42
        cpu.step(&mut bus); // STA $10
        assert_eq!(bus.cpu_read(0x0010), 0x42);
    }

    #[test]
    fn test_adc_overflow_and_carry() {
        // 0x50 + 0x50 = 0xA0: signed overflow, no carry
        let (mut cpu, mut bus) = setup(&[0x69, 0x50]);
        cpu.a = 0x50;
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.get_flag(flags::OVERFLOW));
        assert!(!cpu.get_flag(flags::CARRY));

        // 0xFF + 0x01 = 0x100: carry out, zero result
        let (mut cpu, mut bus) = setup(&[0x69, 0x01]);
        cpu.a = 0xFF;
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.get_flag(flags::CARRY));
        assert!(cpu.get_flag(flags::ZERO));
        assert!(!cpu.get_flag(flags::OVERFLOW));
    }

    #[test]
    fn test_sbc_borrow() {
        // With carry set (no borrow): 0x10 - 0x05 = 0x0B
        let (mut cpu, mut bus) = setup(&[0xE9, 0x05]);
        cpu.a = 0x10;
        cpu.set_flag(flags::CARRY);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x0B);
        assert!(cpu.get_flag(flags::CARRY));
    }

    #[test]
    fn test_branch_cycle_penalties() {
        // BNE taken, no page cross: 3 cycles
        let (mut cpu, mut bus) = setup(&[0xD0, 0x02]);
        cpu.clear_flag(flags::ZERO);
        assert_eq!(cpu.step(&mut bus), 3);
        assert_eq!(cpu.pc, 0x0204);

        // BNE not taken: 2 cycles
        let (mut cpu, mut bus) = setup(&[0xD0, 0x02]);
        cpu.set_flag(flags::ZERO);
        assert_eq!(cpu.step(&mut bus), 2);
        assert_eq!(cpu.pc, 0x0202);

        // BNE taken across a page: 4 cycles
        let (mut cpu, mut bus) = setup(&[]);
        bus.cpu_write(0x02F0, 0xD0);
        bus.cpu_write(0x02F1, 0x20);
        cpu.pc = 0x02F0;
        cpu.clear_flag(flags::ZERO);
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.pc, 0x0312);
    }

    #[test]
    fn test_page_cross_read_penalty() {
        // LDA $02FF,X with X=1 crosses into $0300
        let (mut cpu, mut bus) = setup(&[0xBD, 0xFF, 0x02]);
        cpu.x = 0x01;
        bus.cpu_write(0x0300, 0x77);
        assert_eq!(cpu.step(&mut bus), 5);
        assert_eq!(cpu.a, 0x77);

        // Store never pays the penalty
        let (mut cpu, mut bus) = setup(&[0x9D, 0xFF, 0x02]);
        cpu.x = 0x01;
        cpu.a = 0x55;
        assert_eq!(cpu.step(&mut bus), 5);
        assert_eq!(bus.cpu_read(0x0300), 0x55);
    }

    #[test]
    fn test_jsr_rts_pair() {
        let (mut cpu, mut bus) = setup(&[0x20, 0x10, 0x03]); // JSR $0310
        bus.cpu_write(0x0310, 0x60); // RTS
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x0310);
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x0203, "RTS resumes after the JSR operand");
    }

    #[test]
    fn test_php_plp_break_handling() {
        let (mut cpu, mut bus) = setup(&[0x08, 0x28]); // PHP, PLP
        cpu.status = flags::UNUSED | flags::CARRY;
        cpu.step(&mut bus);

        // PHP pushes with B set
        let pushed = bus.cpu_read(0x0100 | cpu.sp.wrapping_add(1) as u16);
        assert_ne!(pushed & flags::BREAK, 0);

        cpu.status = flags::UNUSED;
        cpu.step(&mut bus);
        // PLP restores flags but B stays clear in the live register
        assert!(cpu.get_flag(flags::CARRY));
        assert!(!cpu.get_flag(flags::BREAK));
    }

    #[test]
    fn test_rmw_on_memory_and_accumulator() {
        let (mut cpu, mut bus) = setup(&[0x0A, 0x06, 0x10]); // ASL A, ASL $10
        cpu.a = 0x81;
        bus.cpu_write(0x0010, 0x40);

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.get_flag(flags::CARRY));

        cpu.step(&mut bus);
        assert_eq!(bus.cpu_read(0x0010), 0x80);
        assert!(!cpu.get_flag(flags::CARRY));
    }

    #[test]
    fn test_brk_vectors_through_irq() {
        let (mut cpu, mut bus) = setup(&[0x00]);
        let sp_before = cpu.sp;
        cpu.step(&mut bus);

        // No cartridge: vector reads as $0000
        assert_eq!(cpu.pc, 0x0000);
        assert!(cpu.get_flag(flags::INTERRUPT_DISABLE));
        assert_eq!(cpu.sp, sp_before.wrapping_sub(3));
    }

    #[test]
    fn test_unofficial_opcode_is_nop() {
        let (mut cpu, mut bus) = setup(&[0xFF, 0xA9, 0x01]);
        assert_eq!(cpu.step(&mut bus), 2);
        assert_eq!(cpu.pc, 0x0201);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x01);
    }

    #[test]
    fn test_compare_flags() {
        let (mut cpu, mut bus) = setup(&[0xC9, 0x10]); // CMP #$10
        cpu.a = 0x10;
        cpu.step(&mut bus);
        assert!(cpu.get_flag(flags::ZERO));
        assert!(cpu.get_flag(flags::CARRY));

        let (mut cpu, mut bus) = setup(&[0xC9, 0x20]);
        cpu.a = 0x10;
        cpu.step(&mut bus);
        assert!(!cpu.get_flag(flags::CARRY));
        assert!(cpu.get_flag(flags::NEGATIVE));
    }
}
