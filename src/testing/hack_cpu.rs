use std::collections::HashMap;

const RAM_SIZE: usize = 32 * 1024;
const FIRST_VARIABLE: u16 = 16;

#[derive(Debug, Clone)]
enum Op {
    Address(u16),
    Compute {
        comp: String,
        use_m: bool,
        dest_a: bool,
        dest_d: bool,
        dest_m: bool,
        jump: Option<String>,
    },
}

/// Executes generated assembly directly, resolving symbols the way the
/// target assembler does.
pub struct HackCpu {
    rom: Vec<Op>,
    labels: HashMap<String, u16>,
    ram: Vec<i16>,
    a: i16,
    d: i16,
    pc: usize,
}

impl HackCpu {
    pub fn load(lines: &[String]) -> Result<Self, String> {
        let mut labels = HashMap::new();
        let mut code = Vec::new();

        for raw in lines {
            let line = match raw.find("//") {
                Some(idx) => &raw[..idx],
                None => raw.as_str(),
            }
            .trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
                if labels.insert(name.to_string(), code.len() as u16).is_some() {
                    return Err(format!("duplicate label '{}'", name));
                }
            } else {
                code.push(line.to_string());
            }
        }

        let mut variables: HashMap<String, u16> = HashMap::new();
        let mut next_variable = FIRST_VARIABLE;
        let mut rom = Vec::with_capacity(code.len());

        for line in &code {
            let op = if let Some(symbol) = line.strip_prefix('@') {
                let value = if let Ok(n) = symbol.parse::<u16>() {
                    n
                } else if let Some(addr) = predefined(symbol) {
                    addr
                } else if let Some(addr) = labels.get(symbol) {
                    *addr
                } else {
                    *variables.entry(symbol.to_string()).or_insert_with(|| {
                        let addr = next_variable;
                        next_variable += 1;
                        addr
                    })
                };
                Op::Address(value)
            } else {
                parse_compute(line)?
            };
            rom.push(op);
        }

        Ok(Self {
            rom,
            labels,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
        })
    }

    pub fn set(&mut self, addr: u16, value: i16) {
        self.ram[addr as usize] = value;
    }

    pub fn ram(&self, addr: u16) -> i16 {
        self.ram[addr as usize]
    }

    /// Run until the program counter reaches `label`.
    pub fn run_until(&mut self, label: &str, max_steps: usize) -> Result<usize, String> {
        let target = *self
            .labels
            .get(label)
            .ok_or_else(|| format!("no label '{}'", label))? as usize;

        for step in 0..max_steps {
            if self.pc == target {
                return Ok(step);
            }
            self.step()?;
        }
        Err(format!("'{}' not reached after {} steps", label, max_steps))
    }

    /// Run until execution falls off the end of the program.
    pub fn run(&mut self, max_steps: usize) -> Result<usize, String> {
        for step in 0..max_steps {
            if self.pc >= self.rom.len() {
                return Ok(step);
            }
            self.step()?;
        }
        Err(format!("program still running after {} steps", max_steps))
    }

    fn step(&mut self) -> Result<(), String> {
        let op = self
            .rom
            .get(self.pc)
            .cloned()
            .ok_or_else(|| format!("pc {} outside program", self.pc))?;

        match op {
            Op::Address(v) => {
                self.a = v as i16;
                self.pc += 1;
            }
            Op::Compute {
                comp,
                use_m,
                dest_a,
                dest_d,
                dest_m,
                jump,
            } => {
                let addr = self.a as u16 as usize;
                let y = if use_m { self.memory(addr)? } else { self.a };
                let out = alu(&comp, self.d, y).ok_or_else(|| format!("bad comp '{}'", comp))?;

                if dest_m {
                    if addr >= RAM_SIZE {
                        return Err(format!("write outside ram at {}", addr));
                    }
                    self.ram[addr] = out;
                }
                if dest_d {
                    self.d = out;
                }
                let target = self.a as u16 as usize;
                if dest_a {
                    self.a = out;
                }

                let taken = match jump.as_deref() {
                    None => false,
                    Some("JGT") => out > 0,
                    Some("JEQ") => out == 0,
                    Some("JGE") => out >= 0,
                    Some("JLT") => out < 0,
                    Some("JNE") => out != 0,
                    Some("JLE") => out <= 0,
                    Some("JMP") => true,
                    Some(other) => return Err(format!("bad jump '{}'", other)),
                };
                self.pc = if taken { target } else { self.pc + 1 };
            }
        }
        Ok(())
    }

    fn memory(&self, addr: usize) -> Result<i16, String> {
        self.ram
            .get(addr)
            .copied()
            .ok_or_else(|| format!("read outside ram at {}", addr))
    }
}

fn predefined(symbol: &str) -> Option<u16> {
    match symbol {
        "SP" => Some(0),
        "LCL" => Some(1),
        "ARG" => Some(2),
        "THIS" => Some(3),
        "THAT" => Some(4),
        "SCREEN" => Some(16384),
        "KBD" => Some(24576),
        _ => symbol
            .strip_prefix('R')
            .and_then(|n| n.parse::<u16>().ok())
            .filter(|n| *n < 16),
    }
}

fn parse_compute(line: &str) -> Result<Op, String> {
    let text: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let (assign, jump) = match text.split_once(';') {
        Some((l, j)) => (l, Some(j.to_string())),
        None => (text.as_str(), None),
    };
    let (dest, comp) = match assign.split_once('=') {
        Some((d, c)) => (d, c),
        None => ("", assign),
    };

    let use_m = comp.contains('M');
    let comp = comp.replace('M', "A");
    if alu(&comp, 0, 0).is_none() {
        return Err(format!("bad comp in '{}'", line));
    }

    Ok(Op::Compute {
        comp,
        use_m,
        dest_a: dest.contains('A'),
        dest_d: dest.contains('D'),
        dest_m: dest.contains('M'),
        jump,
    })
}

/// Target ALU; `y` is either A or M.
fn alu(comp: &str, d: i16, y: i16) -> Option<i16> {
    Some(match comp {
        "0" => 0,
        "1" => 1,
        "-1" => -1,
        "D" => d,
        "A" => y,
        "!D" => !d,
        "!A" => !y,
        "-D" => d.wrapping_neg(),
        "-A" => y.wrapping_neg(),
        "D+1" => d.wrapping_add(1),
        "A+1" => y.wrapping_add(1),
        "D-1" => d.wrapping_sub(1),
        "A-1" => y.wrapping_sub(1),
        "D+A" | "A+D" => d.wrapping_add(y),
        "D-A" => d.wrapping_sub(y),
        "A-D" => y.wrapping_sub(d),
        "D&A" | "A&D" => d & y,
        "D|A" | "A|D" => d | y,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(src: &str) -> Vec<String> {
        src.lines().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_runs_straight_line_code() {
        let mut cpu = HackCpu::load(&program("@7\nD=A\n@x\nM=D\n@R3\nM=-1")).unwrap();
        cpu.run(100).unwrap();
        assert_eq!(cpu.ram(16), 7);
        assert_eq!(cpu.ram(3), -1);
    }

    #[test]
    fn test_labels_and_jumps() {
        let mut cpu = HackCpu::load(&program(
            "@3\nD=A\n(LOOP)\n@i\nM=M+1\nD=D-1\n@LOOP\nD;JGT\n(END)\n@END\n0;JMP",
        ))
        .unwrap();
        cpu.run_until("END", 100).unwrap();
        assert_eq!(cpu.ram(16), 3);
    }

    #[test]
    fn test_rejects_unknown_comp() {
        assert!(HackCpu::load(&program("D=D*A")).is_err());
    }
}
