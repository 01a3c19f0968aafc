//! Flag and arithmetic helpers. All operations take the operand width
//! explicitly and wrap; nothing here can fail.

use super::state::{CpuState, StatusFlags};

#[inline]
pub(crate) fn width_mask(is_8bit: bool) -> u16 {
    if is_8bit {
        0x00FF
    } else {
        0xFFFF
    }
}

#[inline]
fn sign_bit(is_8bit: bool) -> u16 {
    if is_8bit {
        0x0080
    } else {
        0x8000
    }
}

pub(crate) fn set_nz(state: &mut CpuState, value: u16, is_8bit: bool) {
    let value = value & width_mask(is_8bit);
    state.p.set(StatusFlags::ZERO, value == 0);
    state.p.set(StatusFlags::NEGATIVE, value & sign_bit(is_8bit) != 0);
}

/// Write `value` into the accumulator at the current M width. The high byte
/// (B) survives 8-bit operations.
pub(crate) fn store_a(state: &mut CpuState, value: u16) {
    if state.memory_is_8bit() {
        state.a = (state.a & 0xFF00) | (value & 0x00FF);
    } else {
        state.a = value;
    }
}

/// ADC and SBC share one adder: SBC feeds the complemented operand. Decimal
/// mode adjusts nibble by nibble, and V is taken before the final adjust.
fn add_with_carry(state: &mut CpuState, operand: u16, subtract: bool) {
    let is_8bit = state.memory_is_8bit();
    let mask = width_mask(is_8bit) as i32;
    let a = (state.a as i32) & mask;
    let data = if subtract {
        !(operand as i32) & mask
    } else {
        (operand as i32) & mask
    };
    let mut carry = state.p.contains(StatusFlags::CARRY) as i32;

    let mut result;
    if state.p.contains(StatusFlags::DECIMAL) {
        let nibbles = if is_8bit { 2 } else { 4 };
        result = 0i32;
        for i in 0..nibbles {
            let shift = i * 4;
            let nibble = 0x0F << shift;
            let below = (1 << shift) - 1;
            result = (a & nibble) + (data & nibble) + (carry << shift) + (result & below);
            if i == nibbles - 1 {
                break;
            }
            let limit = (0x10 << shift) - 1;
            if subtract {
                if result <= limit {
                    result -= 0x06 << shift;
                }
            } else if result > (0x0A << shift) - 1 {
                result += 0x06 << shift;
            }
            carry = (result > limit) as i32;
        }
    } else {
        result = a + data + carry;
    }

    let sign = sign_bit(is_8bit) as i32;
    let overflow = !(a ^ data) & (a ^ result) & sign != 0;
    state.p.set(StatusFlags::OVERFLOW, overflow);

    if state.p.contains(StatusFlags::DECIMAL) {
        let top = if is_8bit { 4 } else { 12 };
        if subtract {
            if result <= mask {
                result -= 0x06 << top;
            }
        } else if result > (0x0A << top) - 1 {
            result += 0x06 << top;
        }
    }

    state.p.set(StatusFlags::CARRY, result > mask);
    let value = (result & mask) as u16;
    store_a(state, value);
    set_nz(state, value, is_8bit);
}

pub(crate) fn adc(state: &mut CpuState, operand: u16) {
    add_with_carry(state, operand, false);
}

pub(crate) fn sbc(state: &mut CpuState, operand: u16) {
    add_with_carry(state, operand, true);
}

/// CMP/CPX/CPY: `register - operand` without storing. C means no borrow.
pub(crate) fn compare(state: &mut CpuState, register: u16, operand: u16, is_8bit: bool) {
    let mask = width_mask(is_8bit);
    let register = register & mask;
    let operand = operand & mask;
    let result = register.wrapping_sub(operand);
    state.p.set(StatusFlags::CARRY, register >= operand);
    set_nz(state, result, is_8bit);
}

pub(crate) fn bit(state: &mut CpuState, operand: u16, immediate: bool) {
    let is_8bit = state.memory_is_8bit();
    let mask = width_mask(is_8bit);
    state.p.set(StatusFlags::ZERO, state.a & operand & mask == 0);
    if !immediate {
        let sign = sign_bit(is_8bit);
        state.p.set(StatusFlags::NEGATIVE, operand & sign != 0);
        state.p.set(StatusFlags::OVERFLOW, operand & (sign >> 1) != 0);
    }
}

pub(crate) fn asl(state: &mut CpuState, value: u16, is_8bit: bool) -> u16 {
    state.p.set(StatusFlags::CARRY, value & sign_bit(is_8bit) != 0);
    let result = (value << 1) & width_mask(is_8bit);
    set_nz(state, result, is_8bit);
    result
}

pub(crate) fn lsr(state: &mut CpuState, value: u16, is_8bit: bool) -> u16 {
    let value = value & width_mask(is_8bit);
    state.p.set(StatusFlags::CARRY, value & 1 != 0);
    let result = value >> 1;
    set_nz(state, result, is_8bit);
    result
}

pub(crate) fn rol(state: &mut CpuState, value: u16, is_8bit: bool) -> u16 {
    let carry_in = state.p.contains(StatusFlags::CARRY) as u16;
    state.p.set(StatusFlags::CARRY, value & sign_bit(is_8bit) != 0);
    let result = ((value << 1) | carry_in) & width_mask(is_8bit);
    set_nz(state, result, is_8bit);
    result
}

pub(crate) fn ror(state: &mut CpuState, value: u16, is_8bit: bool) -> u16 {
    let value = value & width_mask(is_8bit);
    let carry_in = if state.p.contains(StatusFlags::CARRY) {
        sign_bit(is_8bit)
    } else {
        0
    };
    state.p.set(StatusFlags::CARRY, value & 1 != 0);
    let result = (value >> 1) | carry_in;
    set_nz(state, result, is_8bit);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native16() -> CpuState {
        let mut state = CpuState::new();
        state.emulation_mode = false;
        state.p = StatusFlags::empty();
        state
    }

    #[test]
    fn test_adc_binary_overflow() {
        let mut state = CpuState::new();
        state.a = 0x1250;
        adc(&mut state, 0x50);
        assert_eq!(state.a, 0x12A0);
        assert!(state.flag(StatusFlags::OVERFLOW));
        assert!(state.flag(StatusFlags::NEGATIVE));
        assert!(!state.flag(StatusFlags::CARRY));
    }

    #[test]
    fn test_adc_16bit_carry_out() {
        let mut state = native16();
        state.a = 0xFFFF;
        adc(&mut state, 0x0001);
        assert_eq!(state.a, 0x0000);
        assert!(state.flag(StatusFlags::CARRY));
        assert!(state.flag(StatusFlags::ZERO));
        assert!(!state.flag(StatusFlags::OVERFLOW));
    }

    #[test]
    fn test_sbc_binary_borrow() {
        let mut state = CpuState::new();
        state.p.insert(StatusFlags::CARRY);
        state.a = 0x05;
        sbc(&mut state, 0x06);
        assert_eq!(state.a & 0xFF, 0xFF);
        assert!(!state.flag(StatusFlags::CARRY));
        assert!(state.flag(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_adc_decimal() {
        let mut state = CpuState::new();
        state.p.insert(StatusFlags::DECIMAL);
        state.a = 0x19;
        adc(&mut state, 0x28);
        assert_eq!(state.a & 0xFF, 0x47);
        assert!(!state.flag(StatusFlags::CARRY));

        state.a = 0x99;
        adc(&mut state, 0x01);
        assert_eq!(state.a & 0xFF, 0x00);
        assert!(state.flag(StatusFlags::CARRY));
    }

    #[test]
    fn test_adc_decimal_16bit() {
        let mut state = native16();
        state.p.insert(StatusFlags::DECIMAL);
        state.a = 0x1999;
        adc(&mut state, 0x0001);
        assert_eq!(state.a, 0x2000);
        assert!(!state.flag(StatusFlags::CARRY));
    }

    #[test]
    fn test_sbc_decimal() {
        let mut state = CpuState::new();
        state.p.insert(StatusFlags::DECIMAL | StatusFlags::CARRY);
        state.a = 0x42;
        sbc(&mut state, 0x13);
        assert_eq!(state.a & 0xFF, 0x29);
        assert!(state.flag(StatusFlags::CARRY));

        state.a = 0x00;
        sbc(&mut state, 0x01);
        assert_eq!(state.a & 0xFF, 0x99);
        assert!(!state.flag(StatusFlags::CARRY));
    }

    #[test]
    fn test_compare_truth_table() {
        let mut state = CpuState::new();
        // register < operand
        compare(&mut state, 0x10, 0x20, true);
        assert!(!state.flag(StatusFlags::CARRY));
        assert!(!state.flag(StatusFlags::ZERO));
        assert!(state.flag(StatusFlags::NEGATIVE));
        // register == operand
        compare(&mut state, 0x10, 0x10, true);
        assert!(state.flag(StatusFlags::CARRY));
        assert!(state.flag(StatusFlags::ZERO));
        assert!(!state.flag(StatusFlags::NEGATIVE));
        // register > operand
        compare(&mut state, 0x20, 0x10, true);
        assert!(state.flag(StatusFlags::CARRY));
        assert!(!state.flag(StatusFlags::ZERO));
        assert!(!state.flag(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_bit_immediate_only_sets_zero() {
        let mut state = CpuState::new();
        state.a = 0x01;
        state.p.remove(StatusFlags::NEGATIVE | StatusFlags::OVERFLOW);
        bit(&mut state, 0xC0, true);
        assert!(state.flag(StatusFlags::ZERO));
        assert!(!state.flag(StatusFlags::NEGATIVE));
        assert!(!state.flag(StatusFlags::OVERFLOW));

        bit(&mut state, 0xC1, false);
        assert!(!state.flag(StatusFlags::ZERO));
        assert!(state.flag(StatusFlags::NEGATIVE));
        assert!(state.flag(StatusFlags::OVERFLOW));
    }

    #[test]
    fn test_rotates_through_carry() {
        let mut state = CpuState::new();
        state.p.insert(StatusFlags::CARRY);
        assert_eq!(rol(&mut state, 0x80, true), 0x01);
        assert!(state.flag(StatusFlags::CARRY));
        assert_eq!(ror(&mut state, 0x01, true), 0x80);
        assert!(state.flag(StatusFlags::CARRY));
        assert_eq!(asl(&mut state, 0x4000, false), 0x8000);
        assert!(!state.flag(StatusFlags::CARRY));
        assert_eq!(lsr(&mut state, 0x0001, false), 0);
        assert!(state.flag(StatusFlags::ZERO));
    }
}
