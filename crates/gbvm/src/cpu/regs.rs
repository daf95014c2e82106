use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::ProgramCounter;

bitflags! {
    /// Flag bits in the F register.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: Z (zero)
    /// - bit 6: N (subtract)
    /// - bit 5: H (half carry)
    /// - bit 4: C (carry)
    ///
    /// The low nibble of F does not exist on hardware and always reads as 0.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const Z = 1 << 7;
        const N = 1 << 6;
        const H = 1 << 5;
        const C = 1 << 4;
    }
}

/// 8-bit register selector. The discriminant is the slot in the register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A = 0,
    F = 1,
    B = 2,
    C = 3,
    D = 4,
    E = 5,
    H = 6,
    L = 7,
}

/// 16-bit register selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Reg16 {
    /// High/low halves for the pairs that live in the register file.
    #[inline]
    const fn halves(self) -> Option<(Reg8, Reg8)> {
        match self {
            Reg16::AF => Some((Reg8::A, Reg8::F)),
            Reg16::BC => Some((Reg8::B, Reg8::C)),
            Reg16::DE => Some((Reg8::D, Reg8::E)),
            Reg16::HL => Some((Reg8::H, Reg8::L)),
            Reg16::SP | Reg16::PC => None,
        }
    }
}

/// Registers for the Game Boy CPU (LR35902).
///
/// The eight 8-bit registers live in one byte array in A, F, B, C, D, E, H, L
/// order, so each pair (AF, BC, DE, HL) is two adjacent slots read high byte
/// first. Writing B and then reading BC observes the write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    file: [u8; 8],
    pub sp: u16,
    pub pc: ProgramCounter,
}

macro_rules! byte_accessors {
    ($($get:ident, $set:ident => $reg:ident;)*) => {
        $(
            #[inline]
            pub fn $get(&self) -> u8 {
                self.get(Reg8::$reg)
            }

            #[inline]
            pub fn $set(&mut self, value: u8) {
                self.set(Reg8::$reg, value);
            }
        )*
    };
}

macro_rules! pair_accessors {
    ($($get:ident, $set:ident => $reg:ident;)*) => {
        $(
            #[inline]
            pub fn $get(&self) -> u16 {
                self.get16(Reg16::$reg)
            }

            #[inline]
            pub fn $set(&mut self, value: u16) {
                self.set16(Reg16::$reg, value);
            }
        )*
    };
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every register, SP and PC included.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn get(&self, reg: Reg8) -> u8 {
        self.file[reg as usize]
    }

    #[inline]
    pub fn set(&mut self, reg: Reg8, value: u8) {
        self.file[reg as usize] = match reg {
            // Lower 4 bits of F are always zero.
            Reg8::F => value & 0xF0,
            _ => value,
        };
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg.halves() {
            Some((hi, lo)) => u16::from_be_bytes([self.get(hi), self.get(lo)]),
            None if reg == Reg16::SP => self.sp,
            None => self.pc.offset(),
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg.halves() {
            Some((hi, lo)) => {
                let [h, l] = value.to_be_bytes();
                self.set(hi, h);
                self.set(lo, l);
            }
            None if reg == Reg16::SP => self.sp = value,
            None => self.pc.jump(value),
        }
    }

    byte_accessors! {
        a, set_a => A;
        f, set_f => F;
        b, set_b => B;
        c, set_c => C;
        d, set_d => D;
        e, set_e => E;
        h, set_h => H;
        l, set_l => L;
    }

    pair_accessors! {
        af, set_af => AF;
        bc, set_bc => BC;
        de, set_de => DE;
        hl, set_hl => HL;
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.f())
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.set_f(flags.bits());
    }

    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        let mut flags = self.flags();
        flags.set(flag, value);
        self.set_flags(flags);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.set_flags(Flags::empty());
    }

    /// Flat copy of every register for hosts and debuggers.
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            a: self.a(),
            b: self.b(),
            c: self.c(),
            d: self.d(),
            e: self.e(),
            f: self.f(),
            h: self.h(),
            l: self.l(),
            sp: self.sp,
            pc: self.pc.offset(),
        }
    }
}

/// Register values as plain data, serialised with upper-case keys
/// (`{"A":1,"B":0,...,"PC":256}`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct RegisterSnapshot {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}
