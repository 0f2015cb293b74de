//! Binary framing shared by the server and its clients.
//!
//! Every exchange is one request and one response on a fresh connection.
//!
//! ```text
//! request:  [type 1B][content length 1B][content]
//! response: [type 1B][status 1B][content length 1B][content]
//! snapshot: [player to move 1B][42 cells, offset 1 + row * 7 + col, row 0 at the bottom]
//! ```

use std::io::{Read, Write};

use crate::error::{MoveError, ProtocolError};
use crate::game::{Board, Cell, GameState, Player, COLS, ROWS};

/// Size of an encoded game snapshot.
pub const SNAPSHOT_LEN: usize = 1 + ROWS * COLS;

const REQUEST_HEADER_LEN: usize = 2;
const RESPONSE_HEADER_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestType {
    GetGameState = 0x01,
    UpdateGameState = 0x02,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseType {
    Error = 0x01,
    SendGameState = 0x02,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StatusCode {
    Success = 0x00,
    InvalidPlayer = 0x01,
    InvalidColumn = 0x02,
    IllegalMove = 0x03,
    Error = 0xFF,
}

impl StatusCode {
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            0x00 => Ok(StatusCode::Success),
            0x01 => Ok(StatusCode::InvalidPlayer),
            0x02 => Ok(StatusCode::InvalidColumn),
            0x03 => Ok(StatusCode::IllegalMove),
            0xFF => Ok(StatusCode::Error),
            other => Err(ProtocolError::UnknownStatus(other)),
        }
    }
}

impl From<&MoveError> for StatusCode {
    fn from(err: &MoveError) -> Self {
        match err {
            MoveError::WrongTurn { .. } => StatusCode::InvalidPlayer,
            MoveError::OutOfRange(_) => StatusCode::InvalidColumn,
            MoveError::ColumnFull(_) => StatusCode::IllegalMove,
        }
    }
}

/// A client request. The move request carries raw bytes; the server decides
/// what an unknown player or column means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    GetGameState,
    UpdateGameState { player: u8, column: u8 },
}

impl Request {
    pub fn kind(&self) -> RequestType {
        match self {
            Request::GetGameState => RequestType::GetGameState,
            Request::UpdateGameState { .. } => RequestType::UpdateGameState,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let content: Vec<u8> = match *self {
            Request::GetGameState => Vec::new(),
            Request::UpdateGameState { player, column } => vec![player, column],
        };
        let mut bytes = Vec::with_capacity(REQUEST_HEADER_LEN + content.len());
        bytes.push(self.kind() as u8);
        bytes.push(content.len() as u8);
        bytes.extend_from_slice(&content);
        bytes
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let content = framed_content(bytes, REQUEST_HEADER_LEN)?;
        match bytes[0] {
            0x01 => Ok(Request::GetGameState),
            0x02 => match content {
                [player, column, ..] => Ok(Request::UpdateGameState {
                    player: *player,
                    column: *column,
                }),
                _ => Err(ProtocolError::TooShort {
                    expected: REQUEST_HEADER_LEN + 2,
                    actual: bytes.len(),
                }),
            },
            other => Err(ProtocolError::UnknownRequestType(other)),
        }
    }

    /// Read exactly one framed request.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ProtocolError> {
        let bytes = read_frame(reader, REQUEST_HEADER_LEN)?;
        Self::decode(&bytes)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), ProtocolError> {
        writer.write_all(&self.encode())?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    GameState(GameState),
    Error(StatusCode),
}

impl Response {
    pub fn kind(&self) -> ResponseType {
        match self {
            Response::GameState(_) => ResponseType::SendGameState,
            Response::Error(_) => ResponseType::Error,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Response::GameState(_) => StatusCode::Success,
            Response::Error(status) => *status,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let content: Vec<u8> = match self {
            Response::GameState(state) => encode_state(state).to_vec(),
            Response::Error(_) => Vec::new(),
        };
        let mut bytes = Vec::with_capacity(RESPONSE_HEADER_LEN + content.len());
        bytes.push(self.kind() as u8);
        bytes.push(self.status() as u8);
        bytes.push(content.len() as u8);
        bytes.extend_from_slice(&content);
        bytes
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let content = framed_content(bytes, RESPONSE_HEADER_LEN)?;
        let status = StatusCode::from_byte(bytes[1])?;
        match bytes[0] {
            0x01 => Ok(Response::Error(status)),
            0x02 => Ok(Response::GameState(decode_state(content)?)),
            other => Err(ProtocolError::UnknownResponseType(other)),
        }
    }

    /// Read exactly one framed response.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ProtocolError> {
        let bytes = read_frame(reader, RESPONSE_HEADER_LEN)?;
        Self::decode(&bytes)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), ProtocolError> {
        writer.write_all(&self.encode())?;
        writer.flush()?;
        Ok(())
    }
}

/// Content of a frame whose last header byte is the content length.
fn framed_content(bytes: &[u8], header_len: usize) -> Result<&[u8], ProtocolError> {
    if bytes.len() < header_len {
        return Err(ProtocolError::TooShort {
            expected: header_len,
            actual: bytes.len(),
        });
    }
    let content_len = bytes[header_len - 1] as usize;
    bytes
        .get(header_len..header_len + content_len)
        .ok_or(ProtocolError::TooShort {
            expected: header_len + content_len,
            actual: bytes.len(),
        })
}

fn read_frame<R: Read>(reader: &mut R, header_len: usize) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = vec![0u8; header_len];
    reader.read_exact(&mut bytes)?;
    let content_len = bytes[header_len - 1] as usize;
    bytes.resize(header_len + content_len, 0);
    reader.read_exact(&mut bytes[header_len..])?;
    Ok(bytes)
}

pub fn encode_state(state: &GameState) -> [u8; SNAPSHOT_LEN] {
    let mut bytes = [0u8; SNAPSHOT_LEN];
    bytes[0] = state.to_move().number();
    for row in 0..ROWS {
        for col in 0..COLS {
            bytes[1 + row * COLS + col] = state.board().get(row, col).code();
        }
    }
    bytes
}

pub fn decode_state(bytes: &[u8]) -> Result<GameState, ProtocolError> {
    if bytes.len() < SNAPSHOT_LEN {
        return Err(ProtocolError::TooShort {
            expected: SNAPSHOT_LEN,
            actual: bytes.len(),
        });
    }
    let to_move = Player::from_number(bytes[0]).ok_or(ProtocolError::InvalidPlayer(bytes[0]))?;
    let mut board = Board::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            let offset = 1 + row * COLS + col;
            let cell = Cell::from_code(bytes[offset]).ok_or(ProtocolError::InvalidCell {
                offset,
                value: bytes[offset],
            })?;
            board.set(row, col, cell);
        }
    }
    Ok(GameState::from_parts(board, to_move))
}
