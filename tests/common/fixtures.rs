//! Test fixtures - LPK-style source content.

/// File header block as written by the LPK authors
pub const LPK_HEADER: &str = "\
/***************************************************
File:           LPK_AttachOnEvent.cs
Authors:        Christopher Onorati
Last Updated:   2/21/2019
Last Version:   2018.3.4

Description:
  This component causes and object to be attached
  (parented) to another upon receiving a specified event.

Copyright 2018-2019, DigiPen Institute of Technology
***************************************************/
";

/// The header above after conversion
pub const LPK_HEADER_DOXY: &str = "\
/***************************************************
\\file           LPK_AttachOnEvent.cs
\\author        Christopher Onorati
\\date   2/21/2019
\\version   2018.3.4

\\brief
  This component causes and object to be attached
  (parented) to another upon receiving a specified event.

\\copyright 2018-2019, DigiPen Institute of Technology
***************************************************/
";

/// A function comment block with and without inputs
pub const LPK_FUNCTIONS: &str = "\
    /**
    * FUNCTION NAME: OnStart
    * DESCRIPTION  : Sets up what event to listen to.
    * INPUTS       : None
    * OUTPUTS      : None
    **/
    /**
    * FUNCTION NAME: OnEvent
    * DESCRIPTION  : Event validation.
    * INPUTS       : data - Event data to parse for validation.
    * OUTPUTS      : bool - Detection state.
    **/
";

pub const LPK_FUNCTIONS_DOXY: &str = "\
    /**
    * \\fn OnStart
    * \\brief Sets up what event to listen to.
    * 
    * 
    **/
    /**
    * \\fn OnEvent
    * \\brief Event validation.
    * \\param data - Event data to parse for validation.
    * \\return bool - Detection state.
    **/
";
