//! JVM instruction lengths, for linear walks over `Code` bytecode.
//!
//! The scanner never interprets operands beyond the two reference instructions it
//! cares about; it only needs to step from one opcode to the next. Most opcodes
//! have a fixed operand size; `tableswitch`/`lookupswitch` are padded to 4-byte
//! alignment and sized by their embedded bounds, and `wide` modifies its target.

use crate::Result;

/// `getfield`
pub const GETFIELD: u8 = 0xB4;
/// `invokespecial`
pub const INVOKESPECIAL: u8 = 0xB7;

const TABLESWITCH: u8 = 0xAA;
const LOOKUPSWITCH: u8 = 0xAB;
const WIDE: u8 = 0xC4;
const IINC: u8 = 0x84;

/// Fixed operand byte counts per opcode; `VAR` marks the three variable-length
/// shapes, `BAD` an opcode outside the instruction set.
const VAR: u8 = 0xFE;
const BAD: u8 = 0xFF;

#[rustfmt::skip]
const OPERAND_LEN: [u8; 256] = {
    let mut table = [BAD; 256];
    let mut op = 0usize;
    // nop .. dconst_1
    while op <= 0x0F { table[op] = 0; op += 1; }
    table[0x10] = 1; // bipush
    table[0x11] = 2; // sipush
    table[0x12] = 1; // ldc
    table[0x13] = 2; // ldc_w
    table[0x14] = 2; // ldc2_w
    op = 0x15;
    while op <= 0x19 { table[op] = 1; op += 1; } // iload .. aload
    op = 0x1A;
    while op <= 0x35 { table[op] = 0; op += 1; } // iload_0 .. saload
    op = 0x36;
    while op <= 0x3A { table[op] = 1; op += 1; } // istore .. astore
    op = 0x3B;
    while op <= 0x83 { table[op] = 0; op += 1; } // istore_0 .. lxor
    table[0x84] = 2; // iinc
    op = 0x85;
    while op <= 0x98 { table[op] = 0; op += 1; } // i2l .. dcmpg
    op = 0x99;
    while op <= 0xA8 { table[op] = 2; op += 1; } // ifeq .. jsr
    table[0xA9] = 1; // ret
    table[0xAA] = VAR; // tableswitch
    table[0xAB] = VAR; // lookupswitch
    op = 0xAC;
    while op <= 0xB1 { table[op] = 0; op += 1; } // ireturn .. return
    op = 0xB2;
    while op <= 0xB8 { table[op] = 2; op += 1; } // getstatic .. invokestatic
    table[0xB9] = 4; // invokeinterface
    table[0xBA] = 4; // invokedynamic
    table[0xBB] = 2; // new
    table[0xBC] = 1; // newarray
    table[0xBD] = 2; // anewarray
    table[0xBE] = 0; // arraylength
    table[0xBF] = 0; // athrow
    table[0xC0] = 2; // checkcast
    table[0xC1] = 2; // instanceof
    table[0xC2] = 0; // monitorenter
    table[0xC3] = 0; // monitorexit
    table[0xC4] = VAR; // wide
    table[0xC5] = 3; // multianewarray
    table[0xC6] = 2; // ifnull
    table[0xC7] = 2; // ifnonnull
    table[0xC8] = 4; // goto_w
    table[0xC9] = 4; // jsr_w
    table
};

fn read_i32(code: &[u8], offset: usize) -> Result<i32> {
    let bytes: [u8; 4] = code
        .get(offset..offset + 4)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(out_of_bounds_error!())?;
    Ok(i32::from_be_bytes(bytes))
}

/// Total length (opcode included) of the instruction starting at `pc`.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for an opcode outside the instruction set
/// or a switch with inconsistent bounds, and [`crate::Error::OutOfBounds`] for an
/// instruction truncated by the end of the code array.
pub fn instruction_len(code: &[u8], pc: usize) -> Result<usize> {
    let opcode = *code.get(pc).ok_or(out_of_bounds_error!())?;

    let len = match OPERAND_LEN[opcode as usize] {
        BAD => {
            return Err(malformed_error!(
                "Unknown opcode 0x{:02X} at bytecode offset {}",
                opcode,
                pc
            ))
        }
        VAR => match opcode {
            WIDE => {
                let target = *code.get(pc + 1).ok_or(out_of_bounds_error!())?;
                // Operands: the modified opcode plus a 16-bit index, and for
                // wide iinc a 16-bit constant on top
                if target == IINC {
                    5
                } else {
                    3
                }
            }
            TABLESWITCH => {
                let pad = (4 - (pc + 1) % 4) % 4;
                let base = pc + 1 + pad;
                let low = read_i32(code, base + 4)?;
                let high = read_i32(code, base + 8)?;
                if high < low {
                    return Err(malformed_error!(
                        "tableswitch at offset {} has high {} < low {}",
                        pc,
                        high,
                        low
                    ));
                }
                // Widened: hostile bounds can span the whole i32 range
                let entries = i64::from(high) - i64::from(low) + 1;
                let Ok(entries) = usize::try_from(entries) else {
                    return Err(out_of_bounds_error!());
                };
                pad + 12 + entries * 4
            }
            LOOKUPSWITCH => {
                let pad = (4 - (pc + 1) % 4) % 4;
                let base = pc + 1 + pad;
                let npairs = read_i32(code, base + 4)?;
                if npairs < 0 {
                    return Err(malformed_error!(
                        "lookupswitch at offset {} has negative pair count {}",
                        pc,
                        npairs
                    ));
                }
                pad + 8 + npairs as usize * 8
            }
            _ => unreachable!(),
        },
        fixed => fixed as usize,
    };

    let total = 1 + len;
    if pc + total > code.len() {
        return Err(out_of_bounds_error!());
    }
    Ok(total)
}
