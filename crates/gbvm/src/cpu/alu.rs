use super::{Cpu, Flags};

/// Shift/rotate operations shared by the A-register rotates and the first
/// quarter of the CB table. The discriminant is the `y` field of the CB
/// encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Shift {
    Rlc = 0,
    Rrc = 1,
    Rl = 2,
    Rr = 3,
    Sla = 4,
    Sra = 5,
    Swap = 6,
    Srl = 7,
}

impl Shift {
    pub(super) fn from_index(y: u8) -> Self {
        match y & 0x07 {
            0 => Shift::Rlc,
            1 => Shift::Rrc,
            2 => Shift::Rl,
            3 => Shift::Rr,
            4 => Shift::Sla,
            5 => Shift::Sra,
            6 => Shift::Swap,
            _ => Shift::Srl,
        }
    }
}

impl Cpu {
    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// Carries are read off `a ^ b ^ sum`: bit 4 is the carry out of bit 3,
    /// bit 8 the carry out of bit 7.
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a() as u16;
        let b = value as u16;
        let carry_in = u16::from(use_carry && self.get_flag(Flags::C));

        let sum = a + b + carry_in;
        let carry_bits = a ^ b ^ sum;

        self.regs.set_a(sum as u8);

        self.clear_flags();
        self.set_flag(Flags::Z, sum & 0xFF == 0);
        self.set_flag(Flags::H, carry_bits & 0x10 != 0);
        self.set_flag(Flags::C, carry_bits & 0x100 != 0);
    }

    /// Flags for `A - value (- carry)`; returns the 8-bit result.
    ///
    /// Same xor trick as addition: with both operands below 0x100, bit 8 of
    /// `a ^ b ^ result` is the borrow out of bit 7 and bit 4 the borrow out
    /// of bit 3.
    fn alu_sub_flags(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a() as u16;
        let b = value as u16;
        let carry_in = u16::from(use_carry && self.get_flag(Flags::C));

        let result = a.wrapping_sub(b).wrapping_sub(carry_in);
        let carry_bits = a ^ b ^ result;

        self.clear_flags();
        self.set_flag(Flags::Z, result & 0xFF == 0);
        self.set_flag(Flags::N, true);
        self.set_flag(Flags::H, carry_bits & 0x10 != 0);
        self.set_flag(Flags::C, carry_bits & 0x100 != 0);

        result as u8
    }

    /// Core 8-bit SUB/SBC operation on A.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let result = self.alu_sub_flags(value, use_carry);
        self.regs.set_a(result);
    }

    /// Compare A with `value`: the flags of `A - value`, A unchanged.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        self.alu_sub_flags(value, false);
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a() & value;
        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flags::Z, result == 0);
        self.set_flag(Flags::H, true);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a() | value;
        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flags::Z, result == 0);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a() ^ value;
        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flags::Z, result == 0);
    }

    /// Dispatch on the 3-bit ALU operation field (ADD, ADC, SUB, SBC, AND,
    /// XOR, OR, CP).
    pub(super) fn alu_op(&mut self, operation: u8, value: u8) {
        match operation & 0x07 {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            _ => self.alu_cp(value),
        }
    }

    /// 8-bit increment used by INC r and INC (HL).
    ///
    /// C is left as it was; H is set when the low nibble wraps to 0.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flags::Z, result == 0);
        self.set_flag(Flags::N, false);
        self.set_flag(Flags::H, result & 0x0F == 0x00);
        result
    }

    /// 8-bit decrement used by DEC r and DEC (HL).
    ///
    /// C is left as it was; H is set when the low nibble borrows to 0xF.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flags::Z, result == 0);
        self.set_flag(Flags::N, true);
        self.set_flag(Flags::H, result & 0x0F == 0x0F);
        result
    }

    /// `ADD HL,rr`. Z is unaffected; N is cleared.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl() as u32;
        let sum = hl + value as u32;

        self.set_flag(Flags::N, false);
        self.set_flag(Flags::H, (hl ^ value as u32 ^ sum) & 0x1000 != 0);
        self.set_flag(Flags::C, sum & 0x10000 != 0);

        self.regs.set_hl(sum as u16);
    }

    /// Signed 8-bit offset added to a 16-bit base (`ADD SP,r8`,
    /// `LD HL,SP+r8`).
    ///
    /// Z and N are cleared; H and C come from the low byte, as if the
    /// offset were an unsigned byte.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, offset: i8) -> u16 {
        let imm = offset as u8 as u16;
        self.clear_flags();
        self.set_flag(Flags::H, (base & 0x000F) + (imm & 0x000F) > 0x000F);
        self.set_flag(Flags::C, (base & 0x00FF) + (imm & 0x00FF) > 0x00FF);
        base.wrapping_add_signed(offset as i16)
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Uses C, H, N and A to compute a correction; updates A, Z, H, C and
    /// leaves N unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a();
        let mut adjust: u8 = if self.get_flag(Flags::C) { 0x60 } else { 0x00 };
        if self.get_flag(Flags::H) {
            adjust |= 0x06;
        }

        if !self.get_flag(Flags::N) {
            if a & 0x0F > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }

        self.set_flag(Flags::C, adjust >= 0x60);
        self.set_flag(Flags::H, false);
        self.set_flag(Flags::Z, a == 0);
        self.regs.set_a(a);
    }

    /// Rotate/shift `value`; Z is set on a zero result, C takes the bit
    /// shifted out, N and H are cleared.
    pub(super) fn alu_shift(&mut self, shift: Shift, value: u8) -> u8 {
        let carry_in = self.get_flag(Flags::C);
        let (result, carry_out) = match shift {
            Shift::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            Shift::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            Shift::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            Shift::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            Shift::Sla => (value << 1, value & 0x80 != 0),
            Shift::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            Shift::Swap => (value.rotate_left(4), false),
            Shift::Srl => (value >> 1, value & 0x01 != 0),
        };

        self.clear_flags();
        self.set_flag(Flags::Z, result == 0);
        self.set_flag(Flags::C, carry_out);
        result
    }
}
