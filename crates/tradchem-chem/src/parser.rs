// parser.rs
//
// Tokenizador y verificador estructural de SMILES. Cubre el subconjunto
// orgánico, átomos entre corchetes (isótopo, quiralidad, H explícito, carga,
// clase), enlaces, ramas, cierres de anillo (dígito y %nn) y componentes
// separados por punto. No construye el grafo molecular completo: acumula por
// átomo la suma de órdenes de enlace, suficiente para contar hidrógenos
// implícitos según las valencias normales.
use crate::elements;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmilesError {
  #[error("SMILES vacío")]
  Empty,
  #[error("carácter inesperado '{0}' en la posición {1}")]
  UnexpectedChar(char, usize),
  #[error("elemento desconocido '{0}'")]
  UnknownElement(String),
  #[error("corchete sin cerrar")]
  UnclosedBracket,
  #[error("paréntesis desbalanceados")]
  UnbalancedParens,
  #[error("cierre de anillo {0} sin pareja")]
  UnpairedRing(u16),
  #[error("estructura inválida: {0}")]
  Structure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bond {
  Single,
  Double,
  Triple,
  Quadruple,
  Aromatic,
  Up,
  Down,
}

impl Bond {
  pub(crate) fn order(self) -> u32 {
    match self {
      Bond::Single | Bond::Aromatic | Bond::Up | Bond::Down => 1,
      Bond::Double => 2,
      Bond::Triple => 3,
      Bond::Quadruple => 4,
    }
  }

  fn symbol(self) -> char {
    match self {
      Bond::Single => '-',
      Bond::Double => '=',
      Bond::Triple => '#',
      Bond::Quadruple => '$',
      Bond::Aromatic => ':',
      Bond::Up => '/',
      Bond::Down => '\\',
    }
  }
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedAtom {
  pub symbol: String,
  pub aromatic: bool,
  pub bracket: bool,
  pub isotope: Option<u32>,
  pub chirality: Option<String>,
  /// Hidrógenos explícitos de un átomo entre corchetes. Fuera de corchetes
  /// el conteo es implícito por valencia.
  pub explicit_h: Option<u32>,
  pub charge: i32,
  pub class: Option<u32>,
  /// Suma de órdenes de los enlaces ya ligados a este átomo.
  pub bond_order_sum: u32,
}

impl ParsedAtom {
  /// Hidrógenos implícitos según las valencias normales del subconjunto
  /// orgánico. Un átomo aromático reserva un enlace para el sistema
  /// aromático. Átomos entre corchetes nunca reciben H implícitos.
  pub(crate) fn implicit_h(&self) -> u32 {
    if self.bracket {
      return self.explicit_h.unwrap_or(0);
    }
    let degree = if self.aromatic { self.bond_order_sum + 1 } else { self.bond_order_sum };
    for &v in elements::normal_valences(&self.symbol) {
      if v >= degree {
        return v - degree;
      }
    }
    0
  }
}

#[derive(Debug, Clone)]
pub(crate) enum Token {
  Atom(ParsedAtom),
  Bond(Bond),
  Open,
  Close,
  Ring { number: u16 },
  Dot,
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedMolecule {
  pub atoms: Vec<ParsedAtom>,
  pub tokens: Vec<Token>,
}

impl ParsedMolecule {
  pub(crate) fn heavy_atoms(&self) -> usize {
    self.atoms.iter().filter(|a| a.symbol != "H").count()
  }

  pub(crate) fn aromatic_atoms(&self) -> usize {
    self.atoms.iter().filter(|a| a.aromatic).count()
  }

  pub(crate) fn total_hydrogens(&self) -> u32 {
    self.atoms.iter().map(|a| a.implicit_h()).sum()
  }

  /// Fórmula molecular en orden de Hill: C, H y el resto alfabético.
  pub(crate) fn formula(&self) -> String {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for atom in &self.atoms {
      *counts.entry(atom.symbol.clone()).or_insert(0) += 1;
    }
    let hydrogens = self.total_hydrogens() + counts.remove("H").unwrap_or(0);
    let carbons = counts.remove("C").unwrap_or(0);
    let mut rest: Vec<(String, u32)> = counts.into_iter().collect();
    rest.sort();

    let mut out = String::new();
    let mut push = |sym: &str, n: u32, out: &mut String| {
      if n == 0 {
        return;
      }
      out.push_str(sym);
      if n > 1 {
        out.push_str(&n.to_string());
      }
    };
    if carbons > 0 {
      push("C", carbons, &mut out);
      push("H", hydrogens, &mut out);
    } else {
      // Sin carbono todo va alfabético, incluido el hidrógeno.
      rest.push(("H".to_string(), hydrogens));
      rest.sort();
    }
    for (sym, n) in rest {
      push(&sym, n, &mut out);
    }
    out
  }

  /// Masa molecular: masas estándar más los hidrógenos implícitos y
  /// explícitos. Los isótopos usan su número másico como aproximación.
  pub(crate) fn molecular_weight(&self) -> Option<f64> {
    let mut total = 0.0;
    for atom in &self.atoms {
      let mass = match atom.isotope {
        Some(iso) => iso as f64,
        None => elements::mass_of(&atom.symbol)?,
      };
      total += mass + atom.implicit_h() as f64 * 1.008;
    }
    Some(total)
  }

  /// Reemite la secuencia de tokens en forma normalizada. No es una
  /// canonicalización de grafo (eso exige un toolkit completo): normaliza la
  /// escritura de átomos entre corchetes y de los números de anillo.
  pub(crate) fn emit(&self) -> String {
    let mut out = String::new();
    for token in &self.tokens {
      match token {
        Token::Atom(a) => emit_atom(a, &mut out),
        Token::Bond(b) => out.push(b.symbol()),
        Token::Open => out.push('('),
        Token::Close => out.push(')'),
        // El enlace anotado de un cierre de anillo ya fue emitido como
        // Token::Bond; aquí solo va el número.
        Token::Ring { number } => {
          if *number > 9 {
            out.push_str(&format!("%{:02}", number));
          } else {
            out.push_str(&number.to_string());
          }
        }
        Token::Dot => out.push('.'),
      }
    }
    out
  }
}

fn emit_atom(atom: &ParsedAtom, out: &mut String) {
  let symbol = if atom.aromatic { atom.symbol.to_lowercase() } else { atom.symbol.clone() };
  if !atom.bracket {
    out.push_str(&symbol);
    return;
  }
  out.push('[');
  if let Some(iso) = atom.isotope {
    out.push_str(&iso.to_string());
  }
  out.push_str(&symbol);
  if let Some(ch) = &atom.chirality {
    out.push_str(ch);
  }
  match atom.explicit_h {
    Some(1) => out.push('H'),
    Some(n) if n > 1 => out.push_str(&format!("H{}", n)),
    _ => {}
  }
  match atom.charge {
    0 => {}
    1 => out.push('+'),
    -1 => out.push('-'),
    n if n > 1 => out.push_str(&format!("+{}", n)),
    n => out.push_str(&format!("-{}", -n)),
  }
  if let Some(class) = atom.class {
    out.push_str(&format!(":{}", class));
  }
  out.push(']');
}

/// Analiza una cadena SMILES completa. Devuelve error ante cualquier defecto
/// estructural; el llamador decide si lo trata como "inválido" o lo informa.
pub(crate) fn parse(smiles: &str) -> Result<ParsedMolecule, SmilesError> {
  let trimmed = smiles.trim();
  if trimmed.is_empty() {
    return Err(SmilesError::Empty);
  }

  let chars: Vec<char> = trimmed.chars().collect();
  let mut pos = 0usize;
  let mut atoms: Vec<ParsedAtom> = Vec::new();
  let mut tokens: Vec<Token> = Vec::new();
  let mut prev_atom: Option<usize> = None;
  let mut pending_bond: Option<Bond> = None;
  let mut branch_stack: Vec<usize> = Vec::new();
  // número de anillo -> (átomo de apertura, enlace anotado)
  let mut open_rings: HashMap<u16, (usize, Option<Bond>)> = HashMap::new();

  while pos < chars.len() {
    let c = chars[pos];
    match c {
      '[' => {
        let (atom, consumed) = parse_bracket_atom(&chars, pos)?;
        pos += consumed;
        attach_atom(atom, &mut atoms, &mut tokens, &mut prev_atom, &mut pending_bond);
      }
      '(' => {
        let from = prev_atom.ok_or_else(|| SmilesError::Structure("rama sin átomo previo".into()))?;
        if pending_bond.is_some() {
          return Err(SmilesError::Structure("enlace antes de abrir rama".into()));
        }
        branch_stack.push(from);
        tokens.push(Token::Open);
        pos += 1;
      }
      ')' => {
        if pending_bond.is_some() {
          return Err(SmilesError::Structure("enlace colgante al cerrar rama".into()));
        }
        let back = branch_stack.pop().ok_or(SmilesError::UnbalancedParens)?;
        prev_atom = Some(back);
        tokens.push(Token::Close);
        pos += 1;
      }
      '-' | '=' | '#' | '$' | ':' | '/' | '\\' => {
        if prev_atom.is_none() || pending_bond.is_some() {
          return Err(SmilesError::Structure("enlace fuera de lugar".into()));
        }
        let bond = bond_from_char(c);
        pending_bond = Some(bond);
        tokens.push(Token::Bond(bond));
        pos += 1;
      }
      '.' => {
        if pending_bond.is_some() || prev_atom.is_none() {
          return Err(SmilesError::Structure("separador de componente fuera de lugar".into()));
        }
        prev_atom = None;
        tokens.push(Token::Dot);
        pos += 1;
      }
      '0'..='9' => {
        let number = (c as u8 - b'0') as u16;
        close_or_open_ring(number,
                           &mut open_rings,
                           &mut atoms,
                           &mut tokens,
                           prev_atom,
                           &mut pending_bond)?;
        pos += 1;
      }
      '%' => {
        if pos + 2 >= chars.len() || !chars[pos + 1].is_ascii_digit() || !chars[pos + 2].is_ascii_digit() {
          return Err(SmilesError::UnexpectedChar('%', pos));
        }
        let number = (chars[pos + 1] as u8 - b'0') as u16 * 10 + (chars[pos + 2] as u8 - b'0') as u16;
        close_or_open_ring(number,
                           &mut open_rings,
                           &mut atoms,
                           &mut tokens,
                           prev_atom,
                           &mut pending_bond)?;
        pos += 3;
      }
      _ => {
        let (atom, consumed) = parse_organic_atom(&chars, pos)?;
        pos += consumed;
        attach_atom(atom, &mut atoms, &mut tokens, &mut prev_atom, &mut pending_bond);
      }
    }
  }

  if pending_bond.is_some() {
    return Err(SmilesError::Structure("la cadena termina en un enlace".into()));
  }
  if !branch_stack.is_empty() {
    return Err(SmilesError::UnbalancedParens);
  }
  if let Some((&number, _)) = open_rings.iter().next() {
    return Err(SmilesError::UnpairedRing(number));
  }
  if atoms.is_empty() {
    return Err(SmilesError::Empty);
  }
  Ok(ParsedMolecule { atoms, tokens })
}

fn bond_from_char(c: char) -> Bond {
  match c {
    '=' => Bond::Double,
    '#' => Bond::Triple,
    '$' => Bond::Quadruple,
    ':' => Bond::Aromatic,
    '/' => Bond::Up,
    '\\' => Bond::Down,
    _ => Bond::Single,
  }
}

fn attach_atom(atom: ParsedAtom,
               atoms: &mut Vec<ParsedAtom>,
               tokens: &mut Vec<Token>,
               prev_atom: &mut Option<usize>,
               pending_bond: &mut Option<Bond>) {
  let idx = atoms.len();
  tokens.push(Token::Atom(atom.clone()));
  atoms.push(atom);
  if let Some(prev) = *prev_atom {
    let order = match pending_bond.take() {
      Some(b) => b.order(),
      None => 1,
    };
    atoms[prev].bond_order_sum += order;
    atoms[idx].bond_order_sum += order;
  }
  *prev_atom = Some(idx);
  *pending_bond = None;
}

fn close_or_open_ring(number: u16,
                      open_rings: &mut HashMap<u16, (usize, Option<Bond>)>,
                      atoms: &mut [ParsedAtom],
                      tokens: &mut Vec<Token>,
                      prev_atom: Option<usize>,
                      pending_bond: &mut Option<Bond>)
                      -> Result<(), SmilesError> {
  let here = prev_atom.ok_or_else(|| SmilesError::Structure("número de anillo sin átomo previo".into()))?;
  let annotated = pending_bond.take();
  tokens.push(Token::Ring { number });
  match open_rings.remove(&number) {
    Some((there, opened_with)) => {
      if there == here {
        return Err(SmilesError::Structure(format!("el anillo {} se cierra sobre el mismo átomo", number)));
      }
      let order = match (opened_with, annotated) {
        (Some(a), Some(b)) if a != b => {
          return Err(SmilesError::Structure(format!("enlaces contradictorios en el anillo {}", number)));
        }
        (Some(b), _) | (_, Some(b)) => b.order(),
        (None, None) => 1,
      };
      atoms[there].bond_order_sum += order;
      atoms[here].bond_order_sum += order;
    }
    None => {
      open_rings.insert(number, (here, annotated));
    }
  }
  Ok(())
}

/// Átomo del subconjunto orgánico fuera de corchetes: Cl, Br, B, C, N, O,
/// P, S, F, I y los aromáticos b, c, n, o, p, s.
fn parse_organic_atom(chars: &[char], pos: usize) -> Result<(ParsedAtom, usize), SmilesError> {
  let c = chars[pos];
  let next = chars.get(pos + 1).copied();
  let (symbol, aromatic, consumed) = match (c, next) {
    ('C', Some('l')) => ("Cl", false, 2),
    ('B', Some('r')) => ("Br", false, 2),
    ('B', _) => ("B", false, 1),
    ('C', _) => ("C", false, 1),
    ('N', _) => ("N", false, 1),
    ('O', _) => ("O", false, 1),
    ('P', _) => ("P", false, 1),
    ('S', _) => ("S", false, 1),
    ('F', _) => ("F", false, 1),
    ('I', _) => ("I", false, 1),
    ('b', _) => ("B", true, 1),
    ('c', _) => ("C", true, 1),
    ('n', _) => ("N", true, 1),
    ('o', _) => ("O", true, 1),
    ('p', _) => ("P", true, 1),
    ('s', _) => ("S", true, 1),
    _ => return Err(SmilesError::UnexpectedChar(c, pos)),
  };
  Ok((ParsedAtom { symbol: symbol.to_string(),
                   aromatic,
                   bracket: false,
                   isotope: None,
                   chirality: None,
                   explicit_h: None,
                   charge: 0,
                   class: None,
                   bond_order_sum: 0 },
      consumed))
}

/// Átomo entre corchetes: `[isótopo? símbolo quiralidad? H? carga? :clase?]`.
fn parse_bracket_atom(chars: &[char], start: usize) -> Result<(ParsedAtom, usize), SmilesError> {
  debug_assert_eq!(chars[start], '[');
  let mut i = start + 1;

  let mut read_number = |i: &mut usize| -> Option<u32> {
    let begin = *i;
    while *i < chars.len() && chars[*i].is_ascii_digit() {
      *i += 1;
    }
    if *i == begin {
      None
    } else {
      chars[begin..*i].iter().collect::<String>().parse().ok()
    }
  };

  let isotope = read_number(&mut i);

  // Símbolo del elemento: mayúscula + minúscula opcional, o un aromático en
  // minúscula (c, n, o, p, s, se, as).
  let (symbol, aromatic) = if i < chars.len() && chars[i].is_ascii_uppercase() {
    let mut sym = chars[i].to_string();
    i += 1;
    if i < chars.len() && chars[i].is_ascii_lowercase() {
      let two = format!("{}{}", sym, chars[i]);
      if elements::mass_of(&two).is_some() {
        sym = two;
        i += 1;
      }
    }
    (sym, false)
  } else if i < chars.len() && chars[i].is_ascii_lowercase() {
    let two: String = chars[i..chars.len().min(i + 2)].iter().collect();
    if two == "se" || two == "as" {
      i += 2;
      (capitalize(&two), true)
    } else if matches!(chars[i], 'b' | 'c' | 'n' | 'o' | 'p' | 's') {
      let sym = chars[i].to_ascii_uppercase().to_string();
      i += 1;
      (sym, true)
    } else {
      return Err(SmilesError::UnexpectedChar(chars[i], i));
    }
  } else {
    return Err(SmilesError::Structure("corchete sin símbolo de elemento".into()));
  };

  if elements::mass_of(&symbol).is_none() && symbol != "H" {
    return Err(SmilesError::UnknownElement(symbol));
  }

  // Quiralidad
  let mut chirality = None;
  if i < chars.len() && chars[i] == '@' {
    if i + 1 < chars.len() && chars[i + 1] == '@' {
      chirality = Some("@@".to_string());
      i += 2;
    } else {
      chirality = Some("@".to_string());
      i += 1;
    }
  }

  // Hidrógenos explícitos
  let mut explicit_h = None;
  if i < chars.len() && chars[i] == 'H' {
    i += 1;
    explicit_h = Some(read_number(&mut i).unwrap_or(1));
  }

  // Carga: +, -, ++, --, +2, -3...
  let mut charge = 0i32;
  if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
    let sign = if chars[i] == '+' { 1 } else { -1 };
    let sym = chars[i];
    i += 1;
    if let Some(n) = read_number(&mut i) {
      charge = sign * n as i32;
    } else {
      charge = sign;
      while i < chars.len() && chars[i] == sym {
        charge += sign;
        i += 1;
      }
    }
  }

  // Clase de átomo
  let mut class = None;
  if i < chars.len() && chars[i] == ':' {
    i += 1;
    class = Some(read_number(&mut i).ok_or_else(|| SmilesError::Structure("clase de átomo sin número".into()))?);
  }

  if i >= chars.len() || chars[i] != ']' {
    return Err(SmilesError::UnclosedBracket);
  }
  i += 1;

  Ok((ParsedAtom { symbol,
                   aromatic,
                   bracket: true,
                   isotope,
                   chirality,
                   explicit_h,
                   charge,
                   class,
                   bond_order_sum: 0 },
      i - start))
}

fn capitalize(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut it = s.chars();
  if let Some(first) = it.next() {
    out.push(first.to_ascii_uppercase());
  }
  out.extend(it);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ring_closures_pair_by_number() {
    assert!(parse("C1CCCCC1").is_ok());
    assert!(parse("C%12CCCCC%12").is_ok());
    assert!(matches!(parse("C1CC"), Err(SmilesError::UnpairedRing(1))));
  }

  #[test]
  fn contradictory_ring_bonds_are_rejected() {
    // El anillo se abre con doble enlace y se cierra con triple.
    let res = parse("C=1CCCCC#1");
    assert!(matches!(res, Err(SmilesError::Structure(_))));
    // Anotar el mismo orden en ambos lados sí es legal.
    assert!(parse("C=1CCCCC=1").is_ok());
  }

  #[test]
  fn implicit_hydrogens_follow_valence() {
    let m = parse("C=C").unwrap();
    assert_eq!(m.total_hydrogens(), 4);
    let m = parse("C#N").unwrap();
    assert_eq!(m.total_hydrogens(), 1);
    // Azufre hipervalente: la siguiente valencia normal cubre los enlaces.
    let m = parse("O=S(=O)(O)O").unwrap();
    assert_eq!(m.formula(), "H2O4S");
  }

  #[test]
  fn dot_separates_components() {
    let m = parse("[Na+].[Cl-]").unwrap();
    assert_eq!(m.atoms.len(), 2);
    assert!(parse(".C").is_err());
    assert!(parse("C..C").is_err());
  }

  #[test]
  fn bracket_atom_fields_round_trip() {
    let m = parse("[13CH4]").unwrap();
    assert_eq!(m.emit(), "[13CH4]");
    let m = parse("[C@@H](O)C").unwrap();
    assert_eq!(m.emit(), "[C@@H](O)C");
  }
}
